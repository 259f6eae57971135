use crate::config::WindowConfig;
use glutin::dpi::{LogicalSize, PhysicalSize};
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use glutin::window::WindowBuilder;
use glutin::{ContextBuilder, ContextError, CreationError, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};
use std::fmt;
use std::os::raw::c_void;

#[derive(Debug)]
pub enum WindowError {
    Creation(CreationError),
    Context(ContextError),
}

impl From<CreationError> for WindowError {
    fn from(err: CreationError) -> Self {
        WindowError::Creation(err)
    }
}

impl From<ContextError> for WindowError {
    fn from(err: ContextError) -> Self {
        WindowError::Context(err)
    }
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WindowError::Creation(err) => write!(f, "could not create window: {}", err),
            WindowError::Context(err) => write!(f, "GL context error: {}", err),
        }
    }
}

impl ::std::error::Error for WindowError {}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum WindowAction {
    Close,
    Resize(PhysicalSize<u32>),
}

fn action_for(event: &WindowEvent, close_on_escape: bool) -> Option<WindowAction> {
    match *event {
        WindowEvent::CloseRequested => Some(WindowAction::Close),
        WindowEvent::KeyboardInput {
            input: KeyboardInput {
                virtual_keycode: Some(VirtualKeyCode::Escape),
                state: ElementState::Pressed,
                ..
            },
            ..
        } if close_on_escape => Some(WindowAction::Close),
        WindowEvent::Resized(size) => Some(WindowAction::Resize(size)),
        _ => None,
    }
}

/// A window with a current GL context.
pub struct Window {
    event_loop: EventLoop<()>,
    context: WindowedContext<PossiblyCurrent>,
    close_on_escape: bool,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

impl Window {
    /// Creates the window and makes its context current on this thread.
    pub fn new(config: &WindowConfig) -> Result<Self, WindowError> {
        let event_loop = EventLoop::new();
        let builder = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        // Immediate mode only exists in the compatibility profile.
        let context = ContextBuilder::new()
            .with_gl(GlRequest::Latest)
            .with_gl_profile(GlProfile::Compatibility)
            .with_vsync(config.vsync)
            .build_windowed(builder, &event_loop)?;
        let context = unsafe { context.make_current().map_err(|(_, err)| err)? };

        log::info!(
            "created {}x{} window {:?}",
            config.width,
            config.height,
            config.title
        );

        Ok(Window {
            event_loop,
            context,
            close_on_escape: config.close_on_escape,
            close_requested: false,
            resized: None,
        })
    }

    pub fn proc_address(&self, symbol: &str) -> *const c_void {
        self.context.get_proc_address(symbol) as *const _
    }

    pub fn inner_size(&self) -> PhysicalSize<u32> {
        self.context.window().inner_size()
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// The newest size the window was resized to since the last call.
    pub fn take_resize(&mut self) -> Option<PhysicalSize<u32>> {
        self.resized.take()
    }

    pub fn swap_buffers(&self) -> Result<(), WindowError> {
        self.context.swap_buffers()?;
        Ok(())
    }

    /// Handles every pending event and returns without waiting for more.
    pub fn poll_events(&mut self) {
        let Window {
            event_loop,
            context,
            close_on_escape,
            close_requested,
            resized,
        } = self;

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { ref event, .. } => match action_for(event, *close_on_escape) {
                    Some(WindowAction::Close) => {
                        log::debug!("close requested");
                        *close_requested = true;
                    }
                    Some(WindowAction::Resize(size)) => {
                        context.resize(size);
                        *resized = Some(size);
                    }
                    None => (),
                },
                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
                _ => (),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glutin::event::{DeviceId, ModifiersState};

    #[allow(deprecated)]
    fn key(keycode: VirtualKeyCode, state: ElementState) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: unsafe { DeviceId::dummy() },
            input: KeyboardInput {
                scancode: 0,
                state,
                virtual_keycode: Some(keycode),
                modifiers: ModifiersState::empty(),
            },
            is_synthetic: false,
        }
    }

    #[test]
    fn close_request_always_closes() {
        assert_eq!(action_for(&WindowEvent::CloseRequested, false), Some(WindowAction::Close));
    }

    #[test]
    fn escape_closes_only_when_enabled() {
        let press = key(VirtualKeyCode::Escape, ElementState::Pressed);
        assert_eq!(action_for(&press, true), Some(WindowAction::Close));
        assert_eq!(action_for(&press, false), None);

        let release = key(VirtualKeyCode::Escape, ElementState::Released);
        assert_eq!(action_for(&release, true), None);
        assert_eq!(action_for(&key(VirtualKeyCode::Space, ElementState::Pressed), true), None);
    }

    #[test]
    fn resize_carries_the_new_size() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(action_for(&WindowEvent::Resized(size), true), Some(WindowAction::Resize(size)));
    }
}
