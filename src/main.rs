use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use roomwalk::debug::{DebugDumpPlugin, DebugGridVisible};
use roomwalk::grid::OccupancyGrid;
use roomwalk::level::{build_level, door::door_interaction, loader as level_loader};
use roomwalk::player::{
    camera_look, camera_update, cursor_grab, gather_input, sync_camera_transform, track_window_resize,
    KeyBindings,
};
use roomwalk::settings::loader::{self as settings_loader, SETTINGS_DIR};

mod app;
use app::{setup, update_player_fill_light};

fn main() {
    let settings = settings_loader::load_settings_from_dir(SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let layout = level_loader::load_level_from_dir(level_loader::LEVEL_DIR, Some(settings.grid.level.as_str()));
    let mut grid = OccupancyGrid::new(settings.grid.size, settings.grid.segments);
    let doors = build_level(&layout, &mut grid);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Escape Room".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default());

    app.insert_resource(DebugGridVisible(settings.debug.show_grid));
    app.add_plugins(DebugDumpPlugin);

    app.insert_resource(KeyBindings::from_settings(&settings));
    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(grid);
    app.insert_resource(doors);
    app.insert_resource(layout);

    app.add_systems(Startup, setup);

    app.add_systems(
        Update,
        (settings_loader::check_settings_changes, settings_loader::apply_settings).chain(),
    );
    // door toggles settle the grid before the camera reads it this frame
    app.add_systems(
        Update,
        (
            track_window_resize,
            camera_look,
            gather_input,
            door_interaction,
            camera_update,
            sync_camera_transform,
            cursor_grab,
        )
            .chain()
            .after(settings_loader::apply_settings),
    );
    app.add_systems(Update, update_player_fill_light.after(camera_update));

    app.run();
}
