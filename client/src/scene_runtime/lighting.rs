use bevy::light::{DirectionalLightShadowMap, GlobalAmbientLight};
use bevy::prelude::*;

const SUN_POSITION: Vec3 = Vec3::new(50.0, 50.0, 50.0);

/// Marker for the scene's directional light.
#[derive(Component)]
pub struct SceneSunLight;

/// Spawn the sun aimed at the origin and lift the ambient term.
pub fn spawn_scene_lights(
    commands: &mut Commands,
    ambient_light: Option<&mut GlobalAmbientLight>,
    shadows: bool,
) -> Entity {
    let sun = commands
        .spawn((
            SceneSunLight,
            DirectionalLight {
                color: Color::WHITE,
                illuminance: 4000.0,
                shadows_enabled: shadows,
                ..default()
            },
            Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();

    if let Some(ambient_light) = ambient_light {
        ambient_light.color = Color::WHITE;
        ambient_light.brightness = 300.0;
    }

    commands.insert_resource(DirectionalLightShadowMap { size: 2048 });
    debug!("Scene lights spawned (shadows: {shadows})");

    sun
}
