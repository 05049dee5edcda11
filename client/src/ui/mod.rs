use crate::AppState;
use crate::character::{Avatar, AvatarRoot, SkinChangeRequest, SkinChangeStatus, SkinLibrary};
use crate::scene_runtime::loading::SceneLoads;
use crate::settings::{
    self, FpsLimitSetting, GameSettings, ResolutionSetting, SettingsResource, WindowModeSetting,
};
use bevy::camera::ClearColorConfig;
use bevy::prelude::*;
use bevy::state::prelude::OnEnter;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, PrimaryEguiContext, egui};

const STOPPED_BACKGROUND: Color = Color::srgb(0.1, 0.1, 0.15);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudUiState>()
            .add_systems(Startup, spawn_hud_overlay_camera)
            .add_systems(OnEnter(AppState::Loading), reset_hud_state)
            .add_systems(Update, sync_overlay_clear_color)
            .add_systems(EguiPrimaryContextPass, draw_hud_egui);
    }
}

/// Camera egui draws on. It outlives the walk session so the stopped panel
/// still has a surface.
#[derive(Component)]
struct HudOverlayCamera;

#[derive(Resource)]
struct HudUiState {
    settings_open: bool,
    draft: GameSettings,
}

impl Default for HudUiState {
    fn default() -> Self {
        Self {
            settings_open: false,
            draft: GameSettings::default(),
        }
    }
}

fn spawn_hud_overlay_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        HudOverlayCamera,
        PrimaryEguiContext,
    ));
}

fn reset_hud_state(mut hud_state: ResMut<HudUiState>, settings: Res<SettingsResource>) {
    hud_state.settings_open = false;
    hud_state.draft = settings.current.clone();
}

fn sync_overlay_clear_color(
    app_state: Res<State<AppState>>,
    mut overlay_cameras: Query<&mut Camera, With<HudOverlayCamera>>,
) {
    let clear_color = match app_state.get() {
        AppState::Stopped => ClearColorConfig::Custom(STOPPED_BACKGROUND),
        AppState::Loading | AppState::Playing => ClearColorConfig::None,
    };

    for mut camera in &mut overlay_cameras {
        camera.clear_color = clear_color.clone();
    }
}

fn draw_hud_egui(
    mut contexts: EguiContexts,
    mut hud_state: ResMut<HudUiState>,
    mut settings_resource: ResMut<SettingsResource>,
    app_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    loads: Option<Res<SceneLoads>>,
    skins: Option<Res<SkinLibrary>>,
    skin_status: Res<SkinChangeStatus>,
    avatars: Query<&Avatar, With<AvatarRoot>>,
    mut skin_requests: MessageWriter<SkinChangeRequest>,
    mut theme_initialized: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*theme_initialized {
        apply_modern_hud_theme(ctx);
        *theme_initialized = true;
    }

    match app_state.get() {
        AppState::Loading => draw_loading_window(ctx, loads.as_deref()),
        AppState::Playing => {
            let current_skin = avatars.single().ok().map(|avatar| avatar.skin.as_str());
            let requested = draw_skin_picker(
                ctx,
                &mut hud_state,
                &settings_resource,
                skins.as_deref(),
                &skin_status,
                current_skin,
            );
            if let Some(name) = requested {
                skin_requests.write(SkinChangeRequest(name));
            }
        }
        AppState::Stopped => draw_stopped_window(ctx, &mut next_state),
    }

    if hud_state.settings_open {
        draw_settings_modal(&mut hud_state, &mut settings_resource, ctx);
    }
}

fn apply_modern_hud_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(14);
    style.visuals.window_corner_radius = egui::CornerRadius::same(12);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(8);
    ctx.set_style(style);
}

fn draw_loading_window(ctx: &egui::Context, loads: Option<&SceneLoads>) {
    egui::Window::new("Loading")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading the house...");
            });

            let Some(loads) = loads else {
                return;
            };

            ui.add(egui::ProgressBar::new(loads.tracker.progress()).show_percentage());

            let mut failures = loads.tracker.failures().peekable();
            if failures.peek().is_some() {
                ui.separator();
                for (key, reason) in failures {
                    ui.colored_label(
                        egui::Color32::from_rgb(230, 120, 100),
                        format!("{key}: {reason}"),
                    );
                }
            }
        });
}

/// Returns the skin the player picked this frame, if any.
fn draw_skin_picker(
    ctx: &egui::Context,
    hud_state: &mut HudUiState,
    settings_resource: &SettingsResource,
    skins: Option<&SkinLibrary>,
    skin_status: &SkinChangeStatus,
    current_skin: Option<&str>,
) -> Option<String> {
    let mut requested = None;

    egui::Window::new("Change avatar")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            for name in settings_resource.current.gameplay.skin_names() {
                let loaded = skins.is_some_and(|skins| skins.contains(&name));
                let selected = current_skin == Some(name.as_str());
                let label = if loaded {
                    name.clone()
                } else {
                    format!("{name} (not loaded)")
                };

                if ui.selectable_label(selected, label).clicked() {
                    requested = Some(name);
                }
            }

            if let Some(error) = &skin_status.last_error {
                ui.colored_label(egui::Color32::from_rgb(230, 120, 100), error);
            }

            ui.separator();
            ui.small("WASD move, Shift run, Space dance, arrows orbit, Esc stop");
            if ui.button("Settings").clicked() {
                hud_state.settings_open = true;
                hud_state.draft = settings_resource.current.clone();
            }
        });

    requested
}

fn draw_stopped_window(ctx: &egui::Context, next_state: &mut ResMut<NextState<AppState>>) {
    egui::Window::new("Walk stopped")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -30.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.label("The scene has been torn down.");
            ui.add_space(8.0);
            if ui
                .add_sized(egui::vec2(280.0, 34.0), egui::Button::new("Walk again"))
                .clicked()
            {
                next_state.set(AppState::Loading);
            }
        });
}

fn draw_settings_modal(
    hud_state: &mut HudUiState,
    settings_resource: &mut SettingsResource,
    ctx: &egui::Context,
) {
    let mut window_open = hud_state.settings_open;
    let mut should_apply = false;
    let mut should_close = false;

    egui::Window::new("Settings")
        .open(&mut window_open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(480.0)
        .show(ctx, |ui| {
            draw_graphics_settings(ui, &mut hud_state.draft);
            ui.separator();
            draw_gameplay_settings(ui, &mut hud_state.draft);

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                should_apply = ui.button("Apply").clicked();
                should_close = ui.button("Close").clicked();
            });
        });

    if should_apply {
        settings_resource.current = hud_state.draft.clone();
        if let Err(error) = settings_resource.save_to_disk() {
            warn!(
                "Failed to save settings file '{}': {}",
                settings::SETTINGS_FILE_PATH,
                error
            );
        }
    }

    if should_close || !window_open {
        hud_state.draft = settings_resource.current.clone();
        window_open = false;
    }

    hud_state.settings_open = window_open;
}

fn draw_graphics_settings(ui: &mut egui::Ui, draft: &mut GameSettings) {
    egui::ComboBox::from_label("Window mode")
        .selected_text(draft.graphics.window_mode.label())
        .show_ui(ui, |ui| {
            for option in WindowModeSetting::ALL {
                ui.selectable_value(&mut draft.graphics.window_mode, option, option.label());
            }
        });

    egui::ComboBox::from_label("Resolution")
        .selected_text(draft.graphics.resolution.label())
        .show_ui(ui, |ui| {
            for option in ResolutionSetting::presets() {
                ui.selectable_value(&mut draft.graphics.resolution, *option, option.label());
            }
        });

    egui::ComboBox::from_label("FPS limit")
        .selected_text(draft.graphics.fps_limit.label())
        .show_ui(ui, |ui| {
            for option in FpsLimitSetting::ALL {
                ui.selectable_value(&mut draft.graphics.fps_limit, option, option.label());
            }
        });

    ui.checkbox(&mut draft.graphics.vsync, "VSync");
    ui.checkbox(&mut draft.graphics.shadows, "Shadows");
}

fn draw_gameplay_settings(ui: &mut egui::Ui, draft: &mut GameSettings) {
    ui.add(
        egui::Slider::new(&mut draft.gameplay.time_dilation, 0.1..=2.0).text("Time dilation"),
    );
    ui.add(
        egui::Slider::new(&mut draft.gameplay.camera_smoothing, 0.01..=1.0)
            .text("Camera smoothing"),
    );
    ui.add(
        egui::Slider::new(&mut draft.gameplay.collision_distance, 0.0..=20.0)
            .text("Collision distance"),
    );
}
