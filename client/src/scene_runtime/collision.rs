use crate::character::{AvatarRoot, MovementIntent};
use crate::scene_runtime::camera::OrbitalCamera;
use crate::scene_runtime::environment::EnvironmentRoot;
use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;

const PARALLEL_EPSILON: f32 = 1e-7;

/// World-space triangle of a static obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle(pub [Vec3; 3]);

impl Triangle {
    /// Distance along a unit `direction` at which the ray from `origin` hits
    /// this triangle. Both faces count.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let [a, b, c] = self.0;
        let edge_ab = b - a;
        let edge_ac = c - a;

        let p = direction.cross(edge_ac);
        let determinant = edge_ab.dot(p);
        if determinant.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inverse = 1.0 / determinant;

        let to_origin = origin - a;
        let u = to_origin.dot(p) * inverse;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = to_origin.cross(edge_ab);
        let v = direction.dot(q) * inverse;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let distance = edge_ac.dot(q) * inverse;
        (distance > PARALLEL_EPSILON).then_some(distance)
    }
}

/// Triangles of one environment mesh with their bounds.
#[derive(Debug, Clone)]
pub struct ObstacleMesh {
    pub bounds: Aabb3d,
    pub triangles: Vec<Triangle>,
}

impl ObstacleMesh {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Option<Self> {
        let mut points = triangles.iter().flat_map(|triangle| triangle.0);
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), point| {
            (min.min(point), max.max(point))
        });

        Some(Self {
            bounds: Aabb3d {
                min: min.into(),
                max: max.into(),
            },
            triangles,
        })
    }

    /// World-space triangles of a triangle-list mesh. Other topologies and
    /// meshes without float positions yield `None`.
    pub fn from_mesh(mesh: &Mesh, transform: &GlobalTransform) -> Option<Self> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return None;
        }

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            return None;
        };

        let world: Vec<Vec3> = positions
            .iter()
            .map(|position| transform.transform_point(Vec3::from_array(*position)))
            .collect();

        let indices: Vec<usize> = match mesh.indices() {
            Some(indices) => indices.iter().collect(),
            None => (0..world.len()).collect(),
        };

        let triangles = indices
            .chunks_exact(3)
            .filter_map(|corners| {
                Some(Triangle([
                    *world.get(corners[0])?,
                    *world.get(corners[1])?,
                    *world.get(corners[2])?,
                ]))
            })
            .collect();

        Self::from_triangles(triangles)
    }
}

/// Static geometry of the loaded house. Present only once the house scene
/// has been instantiated.
#[derive(Resource, Debug, Clone, Default)]
pub struct StaticObstacles {
    pub meshes: Vec<ObstacleMesh>,
}

impl StaticObstacles {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.triangles.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProbe {
    pub max_distance: f32,
}

impl CollisionProbe {
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// Every hit distance of the ray from `origin` toward `toward`, nearest
    /// first.
    pub fn intersections(
        &self,
        obstacles: &StaticObstacles,
        origin: Vec3,
        toward: Vec3,
    ) -> Vec<f32> {
        let Ok(direction) = Dir3::new(toward - origin) else {
            return Vec::new();
        };
        let ray = RayCast3d::new(origin, direction, f32::MAX);

        let mut hits: Vec<f32> = obstacles
            .meshes
            .iter()
            .filter(|mesh| ray.aabb_intersection_at(&mesh.bounds).is_some())
            .flat_map(|mesh| mesh.triangles.iter())
            .filter_map(|triangle| triangle.ray_distance(origin, *direction))
            .collect();
        hits.sort_by(f32::total_cmp);
        hits
    }

    pub fn is_blocked(&self, obstacles: &StaticObstacles, origin: Vec3, toward: Vec3) -> bool {
        self.intersections(obstacles, origin, toward)
            .first()
            .is_some_and(|distance| *distance < self.max_distance)
    }
}

/// Collect the house triangles once its scene is instantiated and its
/// transforms propagated.
pub fn build_environment_obstacles(
    mut commands: Commands,
    environments: Query<Entity, With<EnvironmentRoot>>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Option<Res<Assets<Mesh>>>,
) {
    let Some(meshes) = meshes else {
        return;
    };
    let mut obstacles = StaticObstacles::default();

    for environment in &environments {
        for descendant in children_query.iter_descendants(environment) {
            let Ok((mesh3d, transform)) = mesh_query.get(descendant) else {
                continue;
            };
            // Geometry still in flight; try again next frame.
            let Some(mesh) = meshes.get(&mesh3d.0) else {
                return;
            };
            obstacles.meshes.extend(ObstacleMesh::from_mesh(mesh, transform));
        }
    }

    if obstacles.meshes.is_empty() {
        return;
    }

    info!(
        "Environment ready: {} obstacle mesh(es), {} triangle(s)",
        obstacles.meshes.len(),
        obstacles.triangle_count()
    );
    commands.insert_resource(obstacles);
}

/// Draw the probe ray, red when it blocks the step.
pub fn draw_collision_probe(
    mut gizmos: Gizmos,
    avatars: Query<(&Transform, &MovementIntent), With<AvatarRoot>>,
    rigs: Query<&OrbitalCamera>,
) {
    let Ok(rig) = rigs.single() else {
        return;
    };

    for (transform, intent) in &avatars {
        let color = if intent.blocked {
            Color::srgb(1.0, 0.2, 0.2)
        } else {
            Color::srgb(0.2, 1.0, 0.4)
        };
        gizmos.line(
            intent.candidate,
            rig.lens_world_position(transform.translation),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::mesh::Indices;

    /// Square wall in the plane z = `z`, spanning x and y in [-10, 10].
    fn wall(z: f32) -> ObstacleMesh {
        let a = Vec3::new(-10.0, -10.0, z);
        let b = Vec3::new(10.0, -10.0, z);
        let c = Vec3::new(10.0, 10.0, z);
        let d = Vec3::new(-10.0, 10.0, z);
        ObstacleMesh::from_triangles(vec![Triangle([a, b, c]), Triangle([a, c, d])]).unwrap()
    }

    #[test]
    fn ray_hits_triangle_at_plane_distance() {
        let triangle = Triangle([
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        ]);
        let distance = triangle.ray_distance(Vec3::ZERO, Vec3::Z).unwrap();
        assert!((distance - 5.0).abs() < 1e-6);
        assert_eq!(triangle.ray_distance(Vec3::ZERO, -Vec3::Z), None);
        assert_eq!(triangle.ray_distance(Vec3::new(3.0, 0.0, 0.0), Vec3::Z), None);
    }

    #[test]
    fn near_wall_blocks_far_wall_does_not() {
        let probe = CollisionProbe::new(7.0);
        let near = StaticObstacles {
            meshes: vec![wall(6.0)],
        };
        let far = StaticObstacles {
            meshes: vec![wall(8.0)],
        };
        let origin = Vec3::new(1.0, -3.0, 0.0);
        let toward = Vec3::new(1.0, -3.0, 100.0);

        assert!(probe.is_blocked(&near, origin, toward));
        assert!(!probe.is_blocked(&far, origin, toward));
    }

    #[test]
    fn all_hits_are_reported_nearest_first() {
        let probe = CollisionProbe::new(7.0);
        let obstacles = StaticObstacles {
            meshes: vec![wall(20.0), wall(3.0)],
        };
        // Off the shared diagonal, so each wall is hit exactly once.
        let origin = Vec3::new(1.0, -3.0, 0.0);
        let hits = probe.intersections(&obstacles, origin, Vec3::new(1.0, -3.0, 50.0));
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 3.0).abs() < 1e-5);
        assert!((hits[1] - 20.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_ray_hits_nothing() {
        let probe = CollisionProbe::new(7.0);
        let obstacles = StaticObstacles {
            meshes: vec![wall(1.0)],
        };
        let origin = Vec3::new(0.0, 0.0, 0.5);
        assert!(probe.intersections(&obstacles, origin, origin).is_empty());
    }

    #[test]
    fn empty_triangle_list_has_no_mesh() {
        assert!(ObstacleMesh::from_triangles(Vec::new()).is_none());
    }

    #[test]
    fn mesh_triangles_are_moved_to_world_space() {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]],
        );
        mesh.insert_indices(Indices::U32(vec![0, 1, 2]));

        let transform = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 4.0));
        let obstacle = ObstacleMesh::from_mesh(&mesh, &transform).unwrap();

        assert_eq!(obstacle.triangles.len(), 1);
        assert_eq!(obstacle.triangles[0].0[2], Vec3::new(0.0, 1.0, 4.0));
        assert_eq!(obstacle.bounds.min, Vec3::new(-1.0, -1.0, 4.0).into());
    }
}
