/// Terminal front end: draws the mirrored puzzle and turns key presses into moves
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info};
use twisty_core::{Camera, Mesh, Modifier, MoveToken, Notice, RotationState};
use twisty_sync::{MoveSubmitter, PuzzleEngine, SharedSession};

pub mod input;
pub mod renderer;

pub use input::Action;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Camera drifts on its own after this long without input
const IDLE_BEFORE_DRIFT: Duration = Duration::from_secs(3);

const DRIFT_PER_FRAME: f32 = 0.004;

const HELP: &str =
    "letters=turn Shift=inverse Alt+letter=button 1/2/3=modifier arrows=orbit Esc=quit";

/// Main application struct for the terminal client
pub struct TerminalApp<E> {
    session: SharedSession,
    submitter: MoveSubmitter<E>,
    runtime: Handle,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    modifier: Modifier,
    banner: Option<String>,
    running: bool,
    last_input: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<E: PuzzleEngine> TerminalApp<E> {
    /// `runtime` runs move submissions so the frame loop never waits on the network
    pub fn new(
        session: SharedSession,
        submitter: MoveSubmitter<E>,
        runtime: Handle,
    ) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(session, submitter, runtime, width, height))
    }

    fn with_size(
        session: SharedSession,
        submitter: MoveSubmitter<E>,
        runtime: Handle,
        width: u16,
        height: u16,
    ) -> Self {
        let mut app = Self {
            session,
            submitter,
            runtime,
            rotation: RotationState::default(),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            modifier: Modifier::None,
            banner: None,
            running: true,
            last_input: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        app
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
                    Event::Resize(width, height) => self.resize(width, height),
                    _ => {}
                }
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.renderer.resize(width as usize, height as usize);
        self.camera
            .set_aspect(width as f32 / (height.max(1) as f32 * CELL_ASPECT));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.last_input = Instant::now();
        // any key press dismisses the banner
        self.banner = None;

        let Some(action) = input::handle_key_event(key) else {
            return;
        };
        debug!(?action, "key");
        match action {
            Action::Quit => self.running = false,
            Action::Turn(token) => self.submit(token),
            Action::Button(key) => match input::button_token(key, self.modifier) {
                Ok(token) => self.submit(token),
                Err(err) => self.session.lock().push_notice(Notice::InvalidMove {
                    token: key.to_string(),
                    status: err.to_string(),
                }),
            },
            Action::SelectModifier(modifier) => self.modifier = modifier,
            Action::Orbit { yaw, pitch } => self.rotation.rotate(yaw, pitch),
        }
    }

    /// Hand the move to the runtime; the result lands in the session
    fn submit(&self, token: MoveToken) {
        info!(%token, "submitting move");
        let submitter = self.submitter.clone();
        self.runtime.spawn(async move {
            // failures are already logged and surfaced as notices
            let _ = submitter.submit(token).await;
        });
    }

    fn update(&mut self) {
        if self.last_input.elapsed() >= IDLE_BEFORE_DRIFT {
            self.rotation.rotate(DRIFT_PER_FRAME, 0.0);
        }
        self.camera.orbit(&self.rotation, Camera::DEFAULT_RADIUS);

        let notices = self.session.lock().take_notices();
        if !notices.is_empty() {
            // notices pile up on the banner until a key dismisses them
            let lines = self
                .banner
                .take()
                .into_iter()
                .chain(notices.iter().map(ToString::to_string));
            self.banner = Some(lines.collect::<Vec<_>>().join(" | "));
        }
    }

    /// World-space meshes at the latest applied placements
    fn frame_meshes(&self) -> Vec<Mesh> {
        let session = self.session.lock();
        session
            .registry()
            .iter()
            .map(|(_, cubie)| cubie.world_mesh())
            .collect()
    }

    fn render(&mut self) -> io::Result<()> {
        let meshes = self.frame_meshes();

        self.renderer.clear();
        for mesh in &meshes {
            self.renderer.render_mesh(mesh, &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let user = self.session.lock().user().to_string();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "twisty | {user} | FPS: {:.1} | turn: {} | {HELP}",
                self.fps,
                input::modifier_label(self.modifier),
            )),
            ResetColor
        )?;

        if let Some(banner) = &self.banner {
            let row = self.renderer.height().saturating_sub(1) as u16;
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                terminal::Clear(ClearType::CurrentLine),
                SetBackgroundColor(Color::DarkRed),
                SetForegroundColor(Color::White),
                Print(format!(" {banner} (press any key) ")),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;
    use twisty_core::{ClientConfig, PuzzleModel, Session};
    use twisty_sync::{LocalEngine, SyncLoop};

    fn app(runtime: &tokio::runtime::Runtime) -> (TerminalApp<LocalEngine>, SharedSession) {
        let session: SharedSession = Arc::new(parking_lot::Mutex::new(
            Session::start(&ClientConfig::default(), "ana").unwrap(),
        ));
        let engine = Arc::new(LocalEngine::new(PuzzleModel::solved(3)));
        let sync = SyncLoop::new(
            Arc::clone(&engine),
            Arc::clone(&session),
            Duration::from_secs(60),
        );
        let submitter = MoveSubmitter::new(engine, Arc::clone(&session), sync.refresher());
        let app = TerminalApp::with_size(
            Arc::clone(&session),
            submitter,
            runtime.handle().clone(),
            80,
            24,
        );
        (app, session)
    }

    fn wait_for_move(session: &SharedSession, expected: &str) {
        let target = PuzzleModel::scrambled(3, expected).unwrap();
        for _ in 0..200 {
            let placements = session.lock().placements();
            if placements
                .iter()
                .zip(target.placements())
                .all(|(a, b)| a.approx_eq(b, 1e-5))
            {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("move {expected} never applied");
    }

    #[test]
    fn test_letter_key_submits_turn() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut app, session) = app(&runtime);

        app.handle_key(KeyEvent::from(KeyCode::Char('R')));
        wait_for_move(&session, "R'");
    }

    #[test]
    fn test_button_uses_selected_modifier() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut app, session) = app(&runtime);

        app.handle_key(KeyEvent::from(KeyCode::Char('3')));
        assert_eq!(app.modifier, Modifier::Double);
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT));
        wait_for_move(&session, "F2");
    }

    #[test]
    fn test_notice_shows_until_next_key() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut app, session) = app(&runtime);

        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT));
        app.update();
        assert_eq!(app.banner.as_deref(), Some("invalid turn: q"));
        assert!(session.lock().take_notices().is_empty());

        app.update();
        assert!(app.banner.is_some());
        app.handle_key(KeyEvent::from(KeyCode::Left));
        assert!(app.banner.is_none());
    }

    #[test]
    fn test_every_notice_reaches_the_banner() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut app, _) = app(&runtime);

        // two rejections before a single frame
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT));
        app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT));
        app.update();
        assert_eq!(
            app.banner.as_deref(),
            Some("invalid turn: q | invalid turn: w")
        );

        // a later notice joins the one still on screen
        app.session.lock().push_notice(Notice::InvalidMove {
            token: "k".into(),
            status: "invalid".into(),
        });
        app.update();
        assert_eq!(
            app.banner.as_deref(),
            Some("invalid turn: q | invalid turn: w | invalid turn: k")
        );
    }

    #[test]
    fn test_escape_stops_loop() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut app, _) = app(&runtime);

        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(!app.running);
    }

    #[test]
    fn test_frame_has_every_cubie() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (app, _) = app(&runtime);
        assert_eq!(app.frame_meshes().len(), 27);
    }
}
