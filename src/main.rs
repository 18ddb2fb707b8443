//! Headless demo: drives a scripted editing session against the manipulation
//! core and logs what happens. A real host would make the same calls from its
//! window message loop; here the "frames" are just iterations of a loop.

use glam::{Vec2, Vec3};
use stagehand::{GizmoModifier, InputSnapshot, Session, SessionEvent, ViewType, Viewport};

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = Session::new(Viewport::new(800.0, 600.0));

    // Populate a small scene the way a host import would.
    let crate_a = session.import_model("meshes/crate.obj", [-0.5; 3], [0.5; 3]);
    let crate_b = session.import_model("meshes/crate.obj", [-0.5; 3], [0.5; 3]);
    let camera = session.add_camera();
    {
        let registry = session.registry_mut();
        registry.get_mut(crate_a).unwrap().transform.position = [-1.0, 2.0, 0.0];
        registry.get_mut(crate_b).unwrap().transform.position = [1.0, 2.0, 0.0];
        registry.get_mut(camera).unwrap().transform.position = [0.0, 4.0, -3.0];
    }

    // Select both crates (second click additive).
    session.pick(&InputSnapshot::at(screen_for(Vec3::new(-1.0, 2.0, 0.0))));
    session.pick(&InputSnapshot {
        cursor: screen_for(Vec3::new(1.0, 2.0, 0.0)),
        additive: true,
        ..InputSnapshot::default()
    });
    log::info!("selection: {:?}", session.selection().ids());

    // Grab the anchor's X arm and drag it one unit to the right with grid
    // snapping enabled.
    session.set_modifier(GizmoModifier::Translate);
    session.toggle_snapping();
    session.pick(&InputSnapshot::at(screen_for(Vec3::new(1.5, 2.0, 0.0))));
    for step in 0..=4 {
        let grab = Vec3::new(1.5 + step as f32 * 0.25, 2.0, 0.0);
        let input = InputSnapshot {
            cursor: screen_for(grab),
            primary: true,
            ..InputSnapshot::default()
        };
        session.update(DT, &input);
    }
    // Button released: the drag ends here.
    session.update(DT, &InputSnapshot::at(screen_for(Vec3::new(2.5, 2.0, 0.0))));

    for event in session.drain_events() {
        match event {
            SessionEvent::SelectionChanged => log::info!("selection changed"),
            SessionEvent::TransformChanged(id) => {
                let actor = session.registry().get(id).unwrap();
                log::info!("{} moved to {:?}", actor.name, actor.transform.position);
            }
        }
    }

    // Orthographic framing follows the view's distance from the origin.
    session.set_active_view(ViewType::Top);
    session.on_mouse_wheel(-240.0);
    session.set_active_view(ViewType::Perspective);

    let copies = session.duplicate_selected();
    log::info!("duplicated {} actors", copies.len());
    session.delete_selected();
    log::info!("scene holds {} actors after delete", session.registry().len());
}

/// Screen point whose pick ray passes through `world`, for the default
/// perspective preset (eye at (0, 2, -5) looking down +Z, 4:3 viewport).
fn screen_for(world: Vec3) -> Vec2 {
    let view = Vec3::new(world.x, world.y - 2.0, world.z + 5.0);
    let ndc_x = 0.75 * view.x / view.z;
    let ndc_y = view.y / view.z;
    Vec2::new((ndc_x + 1.0) * 0.5 * 800.0, (1.0 - ndc_y) * 0.5 * 600.0)
}
