// CART regression tree: variance-reduction splits over every feature.

use crate::dataset::Dataset;

/// Node SSE at or below this is treated as pure.
const IMPURITY_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Rows (in feature-sorted order) that go left.
    n_left: usize,
    sse: f64,
}

/// A fitted tree. Nodes live in one vector; index 0 is the root.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total SSE decrease attributed to each feature.
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Fit on the rows listed in `sample`. Indices may repeat (bootstrap).
    /// `sample` must not be empty.
    pub fn fit(data: &Dataset, sample: &[usize], params: &TreeParams) -> Self {
        let mut builder = Builder {
            data,
            params,
            nodes: Vec::new(),
            impurity_decrease: vec![0.0; data.n_features()],
        };
        builder.build(sample.to_vec(), 0);
        RegressionTree {
            nodes: builder.nodes,
            impurity_decrease: builder.impurity_decrease,
        }
    }

    /// `row` must have one value per training feature.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match self.nodes[at] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => at = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    pub fn impurity_decrease(&self) -> &[f64] {
        &self.impurity_decrease
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

struct Builder<'a> {
    data: &'a Dataset,
    params: &'a TreeParams,
    nodes: Vec<Node>,
    impurity_decrease: Vec<f64>,
}

impl Builder<'_> {
    fn build(&mut self, mut rows: Vec<usize>, depth: usize) -> usize {
        let id = self.nodes.len();
        let (sum, sum_sq) = rows.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let y = self.data.target(i);
            (s + y, sq + y * y)
        });
        let n = rows.len() as f64;
        let mean = sum / n;
        let node_sse = (sum_sq - sum * sum / n).max(0.0);
        self.nodes.push(Node::Leaf { value: mean });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || rows.len() < self.params.min_samples_split || node_sse <= IMPURITY_EPSILON {
            return id;
        }

        let Some(split) = self.best_split(&mut rows) else {
            return id;
        };
        let decrease = node_sse - split.sse;
        if decrease <= IMPURITY_EPSILON {
            return id;
        }
        self.impurity_decrease[split.feature] += decrease;

        let feature = split.feature;
        let data = self.data;
        rows.sort_by(|&a, &b| data.value(a, feature).total_cmp(&data.value(b, feature)));
        let right_rows = rows.split_off(split.n_left);
        let left = self.build(rows, depth + 1);
        let right = self.build(right_rows, depth + 1);
        self.nodes[id] = Node::Split {
            feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Lowest combined child SSE over every feature and cut point. Earlier
    /// features win ties.
    fn best_split(&self, rows: &mut [usize]) -> Option<SplitCandidate> {
        let data = self.data;
        let n = rows.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let mut best: Option<SplitCandidate> = None;
        for feature in 0..data.n_features() {
            rows.sort_by(|&a, &b| data.value(a, feature).total_cmp(&data.value(b, feature)));

            let total: f64 = rows.iter().map(|&i| data.target(i)).sum();
            let total_sq: f64 = rows.iter().map(|&i| data.target(i).powi(2)).sum();
            let (mut left_sum, mut left_sq) = (0.0, 0.0);

            for n_left in 1..n {
                let y = data.target(rows[n_left - 1]);
                left_sum += y;
                left_sq += y * y;

                let x_lo = data.value(rows[n_left - 1], feature);
                let x_hi = data.value(rows[n_left], feature);
                if x_lo == x_hi || n_left < min_leaf || n - n_left < min_leaf {
                    continue;
                }

                let (nl, nr) = (n_left as f64, (n - n_left) as f64);
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / nl).max(0.0)
                    + (right_sq - right_sum * right_sum / nr).max(0.0);

                if best.is_none_or(|b| sse < b.sse) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(x_lo, x_hi),
                        n_left,
                        sse,
                    });
                }
            }
        }
        best
    }
}

/// Cut between two adjacent distinct values. Falls back to the lower value
/// when the midpoint rounds up to the higher one.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi {
        lo
    } else {
        mid
    }
}
