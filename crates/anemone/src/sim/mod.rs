use crate::error::Result;
use crate::graph::{Extent, Graph, Point};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

pub mod drag;

/// Tuning knobs for [`Simulation`]. Defaults mirror the d3-force values the
/// reference visualization runs with (`forceLink().distance(60)`,
/// `forceManyBody().strength(-150)`, stock cooling schedule).
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Spring rest length for every link.
    pub link_distance: f64,
    /// Pairwise repulsion scale (negative repels, d3 `forceManyBody` sign
    /// convention).
    pub charge_strength: f64,
    /// Settle threshold: the simulation counts as settled once `alpha` decays
    /// below this.
    pub alpha_min: f64,
    /// Geometric cooling rate. d3 derives it as `1 - alphaMin^(1/300)` so a
    /// fresh simulation settles in 300 steps.
    pub alpha_decay: f64,
    /// Fraction of velocity retained each step (d3 stores the complement,
    /// `velocityDecay = 0.4`). Guarantees eventual rest even if alpha is held
    /// above the floor.
    pub velocity_decay: f64,
    /// Seed for deterministic randomness. The upstream JS implementation
    /// relies on `Math.random` for coincident-point jiggle and scatter; the
    /// Rust port makes this explicit and reproducible.
    pub random_seed: u64,
    /// When true, seed missing positions by uniform scatter over the canvas
    /// instead of the deterministic phyllotaxis disc.
    pub randomize: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            link_distance: 60.0,
            charge_strength: -150.0,
            alpha_min: 1e-3,
            alpha_decay: 1.0 - 1e-3f64.powf(1.0 / 300.0),
            velocity_decay: 0.6,
            random_seed: 0,
            randomize: false,
        }
    }
}

/// A simulation-owned node. Mutated every step; `fx`/`fy` pin an axis while a
/// drag is active (the node stops integrating on that axis but still repels
/// and attracts others).
#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: String,
    pub group: Option<u32>,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl SimNode {
    pub fn position(&self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

/// Link with endpoints resolved to node indices, spring parameters
/// precomputed at creation (d3-force `link` initialization).
#[derive(Debug, Clone, Copy)]
struct ResolvedLink {
    source: usize,
    target: usize,
    distance: f64,
    /// `weight / min(deg(source), deg(target))`: the d3 degree-normalized
    /// default spring strength, scaled by the caller's weight.
    strength: f64,
    /// `deg(source) / (deg(source) + deg(target))`: the higher-degree
    /// endpoint absorbs less of the correction.
    bias: f64,
}

/// Steppable force-directed layout for an arbitrary node/link set.
///
/// Port of d3-force's velocity-Verlet loop: each step cools `alpha` toward
/// `alpha_target`, accumulates link/charge forces into velocities, re-centers
/// the centroid, then integrates positions with velocity damping. Stepping
/// never fails; degenerate geometry (coincident nodes) is resolved with a
/// seeded jiggle rather than an error.
///
/// Forces are accumulated in caller-supplied node and link order. That order
/// is part of the trajectory contract: reordering changes intermediate frames
/// (not materially the rest shape), so tests should assert on settled
/// positions, not per-frame ones.
#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<ResolvedLink>,
    id_to_idx: FxHashMap<String, usize>,
    extent: Extent,
    opts: SimOptions,
    alpha: f64,
    alpha_target: f64,
    steps: usize,
    active_drags: usize,
    rng: XorShift64Star,
}

impl Simulation {
    /// d3-force `initializeNodes`: nodes without positions start on a
    /// phyllotaxis disc, which is deterministic and keeps early repulsion
    /// well-conditioned.
    const INITIAL_RADIUS: f64 = 10.0;

    /// When a drag starts on a settled layout, alpha is pulled up toward this
    /// target so the push visibly propagates (d3 `alphaTarget(0.3)`).
    const DRAG_ALPHA_TARGET: f64 = 0.3;

    /// d3 `forceManyBody` `distanceMin²`: repulsion saturates below this
    /// squared distance instead of dividing toward infinity.
    const MIN_DISTANCE2: f64 = 1.0;

    /// Step budget for [`Simulation::settle`]. A fresh simulation settles in
    /// 300 steps at the default cooling rate; the margin covers reheats.
    const SETTLE_STEP_BUDGET: usize = 500;

    pub fn new(graph: &Graph, extent: Extent, opts: &SimOptions) -> Result<Self> {
        graph.validate()?;

        let mut rng = XorShift64Star::new(opts.random_seed);
        let center = extent.center();

        let mut nodes: Vec<SimNode> = Vec::with_capacity(graph.nodes.len());
        let mut id_to_idx: FxHashMap<String, usize> = FxHashMap::default();
        id_to_idx.reserve(graph.nodes.len().saturating_mul(2));

        let initial_angle = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
        for (idx, n) in graph.nodes.iter().enumerate() {
            let (x, y) = match n.position {
                Some(p) => (p.x, p.y),
                None if opts.randomize => (
                    rng.next_f64_unit() * extent.width,
                    rng.next_f64_unit() * extent.height,
                ),
                None => {
                    let radius = Self::INITIAL_RADIUS * (0.5 + idx as f64).sqrt();
                    let angle = (idx as f64) * initial_angle;
                    (center.x + radius * angle.cos(), center.y + radius * angle.sin())
                }
            };
            nodes.push(SimNode {
                id: n.id.clone(),
                group: n.group,
                x,
                y,
                vx: 0.0,
                vy: 0.0,
                fx: None,
                fy: None,
            });
            id_to_idx.insert(n.id.clone(), idx);
        }

        // Degree counts feed the default strength/bias, matching d3's link
        // force initialization.
        let mut degree = vec![0usize; nodes.len()];
        let endpoints: Vec<(usize, usize, f64)> = graph
            .links
            .iter()
            .map(|l| {
                // `validate()` guarantees both lookups succeed.
                let s = id_to_idx[l.source.as_str()];
                let t = id_to_idx[l.target.as_str()];
                degree[s] += 1;
                degree[t] += 1;
                (s, t, l.weight)
            })
            .collect();

        let links = endpoints
            .into_iter()
            .map(|(source, target, weight)| {
                let ds = degree[source] as f64;
                let dt = degree[target] as f64;
                ResolvedLink {
                    source,
                    target,
                    distance: opts.link_distance,
                    strength: weight.max(0.0) / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            nodes = nodes.len(),
            links = links.len(),
            seed = opts.random_seed,
            "created force simulation"
        );

        Ok(Self {
            nodes,
            links,
            id_to_idx,
            extent,
            opts: opts.clone(),
            alpha: 1.0,
            alpha_target: 0.0,
            steps: 0,
            active_drags: 0,
            rng,
        })
    }

    /// Advances one integration step. Bounded, non-blocking; the caller owns
    /// the cadence (typically once per rendering frame).
    pub fn step(&mut self) {
        self.steps += 1;
        self.alpha += (self.alpha_target - self.alpha) * self.opts.alpha_decay;

        self.apply_link_force();
        self.apply_charge_force();
        self.apply_center_force();
        self.integrate();
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.opts.alpha_min
    }

    /// Steps until settled or the step budget runs out; returns the number of
    /// steps taken.
    pub fn settle(&mut self) -> usize {
        let mut taken = 0usize;
        while !self.is_settled() && taken < Self::SETTLE_STEP_BUDGET {
            self.step();
            taken += 1;
        }
        tracing::debug!(
            steps = taken,
            alpha = self.alpha,
            settled = self.is_settled(),
            "simulation settle pass finished"
        );
        taken
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.id_to_idx.get(id).map(|&i| &self.nodes[i])
    }

    /// Current coordinate snapshot, keyed by node id.
    pub fn positions(&self) -> BTreeMap<String, Point> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position()))
            .collect()
    }

    /// Resize: re-centers on the next step, never re-seeds positions.
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn apply_link_force(&mut self) {
        for l in 0..self.links.len() {
            let link = self.links[l];
            let s = link.source;
            let t = link.target;

            let mut dx =
                (self.nodes[t].x + self.nodes[t].vx) - (self.nodes[s].x + self.nodes[s].vx);
            let mut dy =
                (self.nodes[t].y + self.nodes[t].vy) - (self.nodes[s].y + self.nodes[s].vy);
            if dx == 0.0 && dy == 0.0 {
                dx = self.rng.jiggle();
                dy = self.rng.jiggle();
            }

            let len = (dx * dx + dy * dy).sqrt();
            // Spring semantics, not a rigid constraint: the correction is
            // proportional to the rest-length violation and fades with alpha.
            let k = (len - link.distance) / len * self.alpha * link.strength;
            let fx = dx * k;
            let fy = dy * k;

            self.nodes[t].vx -= fx * link.bias;
            self.nodes[t].vy -= fy * link.bias;
            self.nodes[s].vx += fx * (1.0 - link.bias);
            self.nodes[s].vy += fy * (1.0 - link.bias);
        }
    }

    fn apply_charge_force(&mut self) {
        // Naive pairwise accumulation, summed in node order. Fine for the
        // tens-of-nodes graphs this serves; a quadtree/grid substitution must
        // keep the same per-node accumulation order to preserve trajectories.
        let n = self.nodes.len();
        for i in 0..n {
            let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
            let mut ax = 0.0f64;
            let mut ay = 0.0f64;
            for j in 0..n {
                if j == i {
                    continue;
                }
                let mut dx = self.nodes[j].x - xi;
                let mut dy = self.nodes[j].y - yi;
                if dx == 0.0 && dy == 0.0 {
                    dx = self.rng.jiggle();
                    dy = self.rng.jiggle();
                }
                // Clamp the squared distance before dividing (d3 manyBody
                // `distanceMin`), so coincident pairs never divide by zero.
                let mut l2 = dx * dx + dy * dy;
                if l2 < Self::MIN_DISTANCE2 {
                    l2 = (Self::MIN_DISTANCE2 * l2).sqrt();
                }
                let w = self.opts.charge_strength * self.alpha / l2;
                ax += dx * w;
                ay += dy * w;
            }
            self.nodes[i].vx += ax;
            self.nodes[i].vy += ay;
        }
    }

    fn apply_center_force(&mut self) {
        // d3 `forceCenter`: translate every position so the centroid lands on
        // the canvas center. Pure translation, so relative spacing and
        // velocities are untouched.
        let n = self.nodes.len();
        if n == 0 {
            return;
        }
        let center = self.extent.center();
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        for node in &self.nodes {
            sx += node.x;
            sy += node.y;
        }
        let dx = sx / (n as f64) - center.x;
        let dy = sy / (n as f64) - center.y;
        for node in &mut self.nodes {
            node.x -= dx;
            node.y -= dy;
        }
    }

    fn integrate(&mut self) {
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= self.opts.velocity_decay;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= self.opts.velocity_decay;
                    node.y += node.vy;
                }
            }
        }
    }

    // Drag plumbing (used by `drag::DragController`). The controller only
    // ever pins/unpins a node and nudges `alpha_target`; force internals stay
    // private to the stepping code above.

    pub(crate) fn node_index(&self, id: &str) -> Option<usize> {
        self.id_to_idx.get(id).copied()
    }

    pub(crate) fn begin_pin(&mut self, idx: usize, pointer: Point) {
        let node = &mut self.nodes[idx];
        node.fx = Some(pointer.x);
        node.fy = Some(pointer.y);
        node.x = pointer.x;
        node.y = pointer.y;
        self.active_drags += 1;
        if self.active_drags == 1 {
            self.alpha_target = Self::DRAG_ALPHA_TARGET;
        }
    }

    pub(crate) fn move_pin(&mut self, idx: usize, pointer: Point) {
        let node = &mut self.nodes[idx];
        node.fx = Some(pointer.x);
        node.fy = Some(pointer.y);
    }

    pub(crate) fn end_pin(&mut self, idx: usize) {
        let node = &mut self.nodes[idx];
        node.fx = None;
        node.fy = None;
        self.active_drags = self.active_drags.saturating_sub(1);
        if self.active_drags == 0 {
            self.alpha_target = 0.0;
        }
    }
}

#[derive(Debug, Clone)]
struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    fn next_f64_unit(&mut self) -> f64 {
        // Map to [0, 1) with 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// d3 `jiggle`: a tiny signed offset that breaks exact coincidence
    /// without visibly perturbing the layout.
    fn jiggle(&mut self) -> f64 {
        (self.next_f64_unit() - 0.5) * 1e-6
    }
}
