//! Font size clustering for heading-level assignment.
//!
//! Observed sizes are grouped into a small number of clusters; clusters larger
//! than the body cluster (the most frequent one) become heading ranks, rank 0
//! being the largest. A document whose dominant font is also its largest has
//! no usable font signal and heading detection falls back to content cues.

use std::collections::HashMap;

/// A group of font sizes treated as equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct FontCluster {
    /// Mean of member sizes
    pub representative: f32,
    /// Distinct member sizes, largest first
    pub members: Vec<f32>,
    /// Total observations across members
    pub count: usize,
    /// Position among all clusters, 0 = largest
    pub rank: usize,
}

/// Groups font sizes into clusters with a relative tolerance merge.
#[derive(Debug, Clone)]
pub struct FontClusterAnalyzer {
    /// Maximum relative gap between adjacent sizes in one cluster
    tolerance: f32,
}

impl FontClusterAnalyzer {
    pub fn new() -> Self {
        Self { tolerance: 0.10 }
    }

    /// Override the relative merge tolerance (default 0.10).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Cluster a multiset of observed font sizes.
    ///
    /// Adjacent distinct sizes (sorted descending) join the same cluster when
    /// their relative gap is within the tolerance. Clustering on consecutive
    /// gaps keeps the operation idempotent: representatives of distinct
    /// clusters are always separated by more than the tolerance.
    pub fn cluster(&self, sizes: &[f32]) -> Vec<FontCluster> {
        let mut histogram: HashMap<i32, usize> = HashMap::new();
        for size in sizes {
            // Round to 0.1pt so float jitter does not split clusters
            *histogram.entry(size_key(*size)).or_insert(0) += 1;
        }

        let mut distinct: Vec<(f32, usize)> = histogram
            .into_iter()
            .map(|(k, n)| (k as f32 / 10.0, n))
            .collect();
        distinct.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut clusters: Vec<FontCluster> = Vec::new();
        let mut members: Vec<(f32, usize)> = Vec::new();

        for (size, count) in distinct {
            let adjacent = members
                .last()
                .map(|(prev, _)| (prev - size) / prev <= self.tolerance)
                .unwrap_or(true);

            if !adjacent {
                clusters.push(Self::seal(std::mem::take(&mut members), clusters.len()));
            }
            members.push((size, count));
        }

        if !members.is_empty() {
            clusters.push(Self::seal(members, clusters.len()));
        }

        clusters
    }

    /// Build the document's font hierarchy from all observed sizes.
    pub fn hierarchy(&self, sizes: &[f32]) -> FontHierarchy {
        FontHierarchy::new(self.cluster(sizes))
    }

    fn seal(members: Vec<(f32, usize)>, rank: usize) -> FontCluster {
        let count = members.iter().map(|(_, n)| n).sum();
        let representative =
            members.iter().map(|(s, _)| s).sum::<f32>() / members.len() as f32;
        FontCluster {
            representative,
            members: members.into_iter().map(|(s, _)| s).collect(),
            count,
            rank,
        }
    }
}

impl Default for FontClusterAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clustered sizes with the body cluster identified, ready for rank lookups.
#[derive(Debug, Clone)]
pub struct FontHierarchy {
    clusters: Vec<FontCluster>,
    /// Index of the body cluster (most observations)
    body_index: usize,
    /// size key -> heading rank for clusters above the body
    rank_by_key: HashMap<i32, usize>,
}

impl FontHierarchy {
    fn new(clusters: Vec<FontCluster>) -> Self {
        let body_index = clusters
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| c.count)
            .map(|(i, _)| i)
            .unwrap_or(0);

        // Heading ranks cover only the clusters strictly above the body
        let mut rank_by_key = HashMap::new();
        for (rank, cluster) in clusters[..body_index].iter().enumerate() {
            for member in &cluster.members {
                rank_by_key.insert(size_key(*member), rank);
            }
        }

        Self {
            clusters,
            body_index,
            rank_by_key,
        }
    }

    /// Whether any cluster sits above the body cluster.
    ///
    /// False for uniform-font documents; content cues are then the only
    /// heading signal.
    pub fn has_signal(&self) -> bool {
        self.body_index > 0
    }

    /// Heading rank of a font size: 0 for the largest cluster, through the
    /// cluster just above the body. Body-sized and smaller fonts yield `None`.
    pub fn heading_rank(&self, size: f32) -> Option<usize> {
        self.rank_by_key.get(&size_key(size)).copied()
    }

    /// Representative size of the body cluster.
    pub fn body_size(&self) -> f32 {
        self.clusters
            .get(self.body_index)
            .map(|c| c.representative)
            .unwrap_or(12.0)
    }

    /// All clusters, largest first.
    pub fn clusters(&self) -> &[FontCluster] {
        &self.clusters
    }
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
