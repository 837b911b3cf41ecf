use geometry::bounds::BBox;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A packet of light deposited on a diffuse surface while tracing from the lights:
///  - `pos`: where it landed,
///  - `power`: path throughput carried by the photon,
///  - `dir`: direction it came from, pointing away from the surface.
#[derive(Debug, Clone, Copy)]
pub struct Photon {
    pub pos: Point3,
    pub power: Color,
    pub dir: Vec3,
}

impl Photon {
    pub fn new(pos: Point3, power: Color, dir: Vec3) -> Self {
        Self { pos, power, dir }
    }
}

/// One photon per node. Nodes are stored in preorder: the left child, if any, immediately
/// follows its parent, and the right child is referenced by index.
#[derive(Debug, Clone, Copy)]
struct Node {
    photon: Photon,
    /// `None` for leaves.
    split_axis: Option<usize>,
    has_left: bool,
    right: Option<usize>,
}

/// Balanced k-d tree over photon positions, split at the median of the widest axis.
/// Built once, read-only afterwards, so it is shared across gathering threads as-is.
#[derive(Debug, Clone, Default)]
pub struct PhotonMap {
    nodes: Vec<Node>,
}

/// A candidate in the k-nearest search, ordered by squared distance.
#[derive(Debug, Clone, Copy)]
struct Neighbour {
    dist2: f32,
    node: usize,
}

impl PartialEq for Neighbour {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Neighbour {}
impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2
            .total_cmp(&other.dist2)
            .then(self.node.cmp(&other.node))
    }
}

/// Result buffer of a k-nearest query: a max-heap keyed by squared distance, so the farthest
/// photon found is on top. Reuse one per worker to avoid allocating at every lookup.
#[derive(Debug, Clone, Default)]
pub struct NearestPhotons {
    heap: BinaryHeap<Neighbour>,
}

impl NearestPhotons {
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    /// Squared distance of the farthest photon found.
    pub fn max_dist2(&self) -> Option<f32> {
        self.heap.peek().map(|n| n.dist2)
    }
    fn clear(&mut self) {
        self.heap.clear();
    }
}

impl PhotonMap {
    pub fn build(mut photons: Vec<Photon>) -> Self {
        let mut nodes = Vec::with_capacity(photons.len());
        build_subtree(&mut nodes, &mut photons);
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds the `k` photons nearest to `target`, or all of them if there are fewer than `k`.
    /// Results replace the previous content of `result`.
    pub fn query_nearest(&self, target: Point3, k: usize, result: &mut NearestPhotons) {
        result.clear();
        if k > 0 && !self.nodes.is_empty() {
            self.search(0, target, k, &mut result.heap);
        }
    }

    /// Photons found by the last query on `result`, in no particular order.
    pub fn photons_in<'a>(
        &'a self, result: &'a NearestPhotons,
    ) -> impl Iterator<Item = &'a Photon> + 'a {
        result.heap.iter().map(move |n| &self.nodes[n.node].photon)
    }

    fn search(&self, index: usize, target: Point3, k: usize, heap: &mut BinaryHeap<Neighbour>) {
        let node = &self.nodes[index];
        if let Some(axis) = node.split_axis {
            let delta = target[axis] - node.photon.pos[axis];
            let left = if node.has_left { Some(index + 1) } else { None };
            let (near, far) = if delta <= 0.0 {
                (left, node.right)
            } else {
                (node.right, left)
            };
            if let Some(child) = near {
                self.search(child, target, k, heap);
            }
            if let Some(child) = far {
                let plane_dist2 = delta * delta;
                let worst = heap.peek().map_or(f32::INFINITY, |n| n.dist2);
                if heap.len() < k || plane_dist2 < worst {
                    self.search(child, target, k, heap);
                }
            }
        }

        let candidate = Neighbour {
            dist2: node.photon.pos.squared_distance_to(target),
            node: index,
        };
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().map_or(false, |worst| candidate.dist2 < worst.dist2) {
            heap.pop();
            heap.push(candidate);
        }
    }
}

/// Appends the subtree over `photons` to `nodes` in preorder; returns its root index.
fn build_subtree(nodes: &mut Vec<Node>, photons: &mut [Photon]) -> Option<usize> {
    let root = nodes.len();
    match photons.len() {
        0 => return None,
        1 => {
            nodes.push(Node {
                photon: photons[0],
                split_axis: None,
                has_left: false,
                right: None,
            });
            return Some(root);
        }
        _ => {}
    }

    let axis = photons
        .iter()
        .fold(BBox::empty(), |b, p| b.enclose(p.pos))
        .widest_axis();
    let mid = photons.len() / 2;
    photons.select_nth_unstable_by(mid, |a, b| a.pos[axis].total_cmp(&b.pos[axis]));
    nodes.push(Node {
        photon: photons[mid],
        split_axis: Some(axis),
        has_left: false,
        right: None,
    });

    let (left, rest) = photons.split_at_mut(mid);
    let has_left = build_subtree(nodes, left).is_some();
    let right = build_subtree(nodes, &mut rest[1..]);
    nodes[root].has_left = has_left;
    nodes[root].right = right;
    Some(root)
}

#[cfg(test)]
mod test {
    use super::*;

    fn photon_at(x: f32, y: f32, z: f32) -> Photon {
        Photon::new(Point3::new(x, y, z), Color::white(), Vec3::Y)
    }

    #[test]
    fn nodes_are_in_preorder() {
        let photons = (0..7).map(|i| photon_at(i as f32, 0.0, 0.0)).collect();
        let map = PhotonMap::build(photons);
        assert_eq!(map.len(), 7);
        let root = map.nodes[0];
        assert_eq!(root.split_axis, Some(0));
        assert_eq!(root.photon.pos.x, 3.0);
        assert!(root.has_left);
        assert_eq!(root.right, Some(4));
        assert!(map.nodes[1].photon.pos.x < 3.0);
        assert!(map.nodes[4].photon.pos.x > 3.0);
        assert_eq!(map.nodes.iter().filter(|n| n.split_axis.is_none()).count(), 4);
    }

    #[test]
    fn query_keeps_farthest_on_top() {
        let photons = (0..10).map(|i| photon_at(0.0, i as f32, 0.0)).collect();
        let map = PhotonMap::build(photons);
        let mut found = NearestPhotons::default();
        map.query_nearest(Point3::new(0.0, 2.2, 0.0), 3, &mut found);
        assert_eq!(found.len(), 3);
        let mut ys: Vec<f32> = map.photons_in(&found).map(|p| p.pos.y).collect();
        ys.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(ys, vec![1.0, 2.0, 3.0]);
        assert!((found.max_dist2().unwrap() - 1.44).abs() < 1e-4);

        map.query_nearest(Point3::ORIGIN, 0, &mut found);
        assert!(found.is_empty());
        assert_eq!(found.max_dist2(), None);
    }

    #[test]
    fn empty_map_finds_nothing() {
        let map = PhotonMap::build(vec![]);
        let mut found = NearestPhotons::default();
        map.query_nearest(Point3::ORIGIN, 5, &mut found);
        assert!(map.is_empty());
        assert!(found.is_empty());
    }
}
