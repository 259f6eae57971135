use crate::config::Config;
use crate::gl_api::loader;
use crate::scene;
use crate::window::Window;

pub struct App;

impl App {
    /// Opens the window and draws until it is closed. Returns how many frames
    /// were drawn.
    pub fn run(config: &Config) -> anyhow::Result<u64> {
        let mut window = Window::new(&config.window)?;
        let caps = loader::load_with(|symbol| window.proc_address(symbol));

        scene::set_clear_color(config.render.clear_color)?;
        let size = window.inner_size();
        scene::set_viewport(size.width, size.height)?;

        // Declared after `window` so GL objects are deleted while the
        // context still exists.
        let mut renderer = scene::build(&config.render, &caps)?;
        log::info!("rendering in {} mode", renderer.mode());

        let mut frames = 0u64;
        loop {
            window.poll_events();
            if window.should_close() {
                break;
            }
            if let Some(size) = window.take_resize() {
                scene::set_viewport(size.width, size.height)?;
            }

            scene::clear()?;
            renderer.draw()?;
            window.swap_buffers()?;
            frames += 1;
        }

        log::info!("window closed after {} frames", frames);
        Ok(frames)
    }
}
