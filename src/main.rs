use glwin32::Traits;
use log::info;

fn load_traits() -> anyhow::Result<Traits> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading window traits from {path}");
            Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(Traits {
            window_name: "glwin32".to_string(),
            x: 100,
            y: 100,
            ..Default::default()
        }),
    }
}

#[cfg(windows)]
fn run(traits: Traits) -> anyhow::Result<()> {
    use glwin32::os::event::GuiEvent;
    use glwin32::{GraphicsContext, GraphicsWindow, WindowingSystem};

    let system = WindowingSystem::win32()?;
    info!(
        "{} screen(s) available",
        system.num_screens(&traits.screen)
    );

    let window = system.create_graphics_window(traits)?;
    if !window.borrow_mut().realize() {
        anyhow::bail!("Unable to realize the graphics window");
    }

    while window.borrow().is_realized() {
        GraphicsWindow::check_events(&window);

        let mut window = window.borrow_mut();
        for event in window.events_mut().take_events() {
            info!("{event:?}");
            if matches!(event, GuiEvent::CloseWindow { .. }) {
                window.close();
            }
        }
        if window.is_realized() && window.make_current() {
            window.swap_buffers();
            window.release_context();
        }
        drop(window);

        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    window.borrow_mut().destroy_window(true);
    Ok(())
}

#[cfg(not(windows))]
fn run(_traits: Traits) -> anyhow::Result<()> {
    log::error!("glwin32 only runs on Windows");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let traits = load_traits()?;
    run(traits)
}
