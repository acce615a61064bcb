use crate::pipeline::backend::RenderBackend;
use crate::scene::node::Node;
use crate::scene::ray::Ray;
use log::debug;

/// Ordered top-level nodes and the single selection.
///
/// The selection is an index into the top-level list, so children of a
/// composite can never be selected on their own. The slot and the nodes'
/// highlight flags are only changed together.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    selected: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node; insertion order is render order. Returns its index.
    pub fn add_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn render<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for node in &self.nodes {
            node.render(backend);
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.and_then(|i| self.nodes.get(i))
    }

    pub fn selected_node_mut(&mut self) -> Option<&mut Node> {
        self.selected.and_then(|i| self.nodes.get_mut(i))
    }

    /// Makes `index` the selection, clearing the previous node's highlight.
    ///
    /// Out-of-range indices leave the scene untouched and return `false`.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.nodes.len() {
            return false;
        }
        self.clear_selection();
        self.nodes[index].set_selected(true);
        self.selected = Some(index);
        true
    }

    /// Drops the selection and its highlight.
    pub fn clear_selection(&mut self) {
        if let Some(node) = self.selected.take().and_then(|i| self.nodes.get_mut(i)) {
            node.set_selected(false);
        }
    }

    /// Index of the top-level node closest to the ray's line.
    ///
    /// Ties go to the earlier node. With `max_distance` set, nodes further away
    /// than that are ignored.
    pub fn pick(&self, ray: &Ray, max_distance: Option<f32>) -> Option<usize> {
        let mut closest = None;
        let mut min_distance = f32::INFINITY;

        for (index, node) in self.nodes.iter().enumerate() {
            let distance = ray.distance_to_point(&node.position());
            if max_distance.is_some_and(|max| distance > max) {
                continue;
            }
            if distance < min_distance {
                closest = Some(index);
                min_distance = distance;
            }
        }

        if let Some(index) = closest {
            debug!("Picked node {} at distance {:.3}", index, min_distance);
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::backend::recording::RecordingBackend;
    use nalgebra::{Point3, Vector3};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_node(Node::cube().at(Vector3::new(-1.0, 0.0, 0.0)));
        scene.add_node(Node::sphere().at(Vector3::new(2.0, 0.0, 0.0)));
        scene.add_node(Node::snow_figure().at(Vector3::new(4.0, 0.0, 0.0)));
        scene
    }

    /// Vertical ray through `(x, *, z)`.
    fn vertical_ray(x: f32, z: f32) -> Ray {
        Ray::new(Point3::new(x, 10.0, z), Point3::new(x, -10.0, z))
    }

    fn highlighted(scene: &Scene) -> Vec<usize> {
        scene
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_selected())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_add_node_appends_in_order() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.add_node(Node::cube()), 0);
        assert_eq!(scene.add_node(Node::cube()), 1);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_render_visits_nodes_in_order() {
        let scene = sample_scene();
        let mut backend = RecordingBackend::new();
        scene.render(&mut backend);

        // cube, sphere, three snow figure spheres
        assert_eq!(backend.primitives().len(), 5);
        assert_eq!(backend.depth(), 1);
    }

    #[test]
    fn test_pick_returns_nearest_node() {
        let scene = sample_scene();
        assert_eq!(scene.pick(&vertical_ray(1.6, 0.0), None), Some(1));
        assert_eq!(scene.pick(&vertical_ray(-0.5, 0.3), None), Some(0));
        assert_eq!(scene.pick(&vertical_ray(9.0, 0.0), None), Some(2));
    }

    #[test]
    fn test_pick_ties_go_to_first_node() {
        let mut scene = Scene::new();
        scene.add_node(Node::cube().at(Vector3::new(-1.0, 0.0, 0.0)));
        scene.add_node(Node::sphere().at(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(scene.pick(&vertical_ray(0.0, 0.0), None), Some(0));
    }

    #[test]
    fn test_pick_without_radius_always_selects() {
        let scene = sample_scene();
        assert!(scene.pick(&vertical_ray(100.0, 100.0), None).is_some());
        assert_eq!(scene.pick(&vertical_ray(100.0, 100.0), Some(1.0)), None);
        assert_eq!(Scene::new().pick(&vertical_ray(0.0, 0.0), None), None);
    }

    #[test]
    fn test_select_moves_the_single_highlight() {
        let mut scene = sample_scene();
        assert!(scene.select(0));
        assert!(scene.select(2));

        assert_eq!(highlighted(&scene), vec![2]);
        assert_eq!(scene.selected_index(), Some(2));
    }

    #[test]
    fn test_select_out_of_range_keeps_selection() {
        let mut scene = sample_scene();
        scene.select(1);
        assert!(!scene.select(7));
        assert_eq!(scene.selected_index(), Some(1));
    }

    #[test]
    fn test_clear_selection_drops_highlight() {
        let mut scene = sample_scene();
        scene.select(1);
        scene.clear_selection();

        assert!(scene.selected_node().is_none());
        assert!(highlighted(&scene).is_empty());
        scene.clear_selection();
    }

    #[test]
    fn test_selected_node_mut_translates_in_place() {
        let mut scene = sample_scene();
        scene.select(0);
        if let Some(node) = scene.selected_node_mut() {
            node.translate(0.0, 0.0, -0.1);
        }
        let position = scene.node(0).map(|n| n.position()).unwrap();
        assert!((position - Point3::new(-1.0, 0.0, -0.1)).norm() < 1e-6);
    }
}
