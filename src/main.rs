mod camera;
mod config;
mod lorenz;
mod overlay;
mod renderer;
mod solver;
mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use camera::Camera;
use renderer::ColorMap;
use state::{SimParams, Trajectory, TrajectoryBatch};

const TITLE: &str = "chaotarium";

/// Convert RGBA &[u8] buffer to 0RGB &[u32] buffer for minifb.
fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (i, pixel) in rgba.chunks_exact(4).enumerate() {
        out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}

fn format_status(params: &SimParams, colormap: ColorMap, panel_visible: bool) -> String {
    if panel_visible {
        "space=close  ud=nav  lr=adj  ,.=fine  r=reset".to_string()
    } else {
        format!(
            "sigma={:.1} rho={:.1} beta={:.2} | n={} horizon={:.1} angle={:.0} [{}] | space=params lr=rotate c=colors",
            params.sigma,
            params.rho,
            params.beta,
            params.trajectories,
            params.horizon,
            params.angle,
            colormap.label(),
        )
    }
}

/// Channels connecting the main (render) thread to the solver thread.
struct SolverChannels {
    param_tx: mpsc::Sender<SimParams>,
    batch_rx: mpsc::Receiver<TrajectoryBatch>,
}

/// Spawn the solver thread and return its channels + join handle.
///
/// The thread computes a batch for its current params, publishes it, then
/// blocks until the next parameter change; the pipeline only recomputes
/// when something changed. Rapid changes are drained to the latest before
/// computing so held-down keys coalesce into one recomputation.
fn spawn_solver_thread(
    initial: SimParams,
) -> (SolverChannels, std::thread::JoinHandle<()>) {
    let (param_tx, param_rx) = mpsc::channel::<SimParams>();
    let (batch_tx, batch_rx) = mpsc::sync_channel::<TrajectoryBatch>(1);

    let handle = std::thread::spawn(move || {
        let mut params = initial;
        loop {
            match solver::generate_batch(&params) {
                Ok(batch) => {
                    if batch_tx.send(batch).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("Warning: {e}; keeping previous plot"),
            }
            let Ok(mut next) = param_rx.recv() else {
                break;
            };
            while let Ok(newer) = param_rx.try_recv() {
                next = newer;
            }
            params = next;
        }
    });

    let channels = SolverChannels { param_tx, batch_rx };
    (channels, handle)
}

fn main() {
    run_gui();
}

fn run_gui() {
    let cfg = config::load();

    let mut params = SimParams {
        sigma: cfg.simulation.sigma,
        rho: cfg.simulation.rho,
        beta: cfg.simulation.beta,
        trajectories: cfg.simulation.trajectories,
        horizon: cfg.simulation.horizon,
        angle: cfg.display.angle,
        seed: cfg.simulation.seed,
    };
    let mut colormap = ColorMap::Viridis;
    let mut status_text = format_status(&params, colormap, false);

    let mut render_cfg = renderer::RenderConfig::fit(cfg.display.width, cfg.display.height);
    let mut w = render_cfg.frame_width;
    let mut h = render_cfg.frame_height;

    let mut window = Window::new(
        TITLE,
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let (channels, solver_thread) = spawn_solver_thread(params.clone());
    let SolverChannels { param_tx, batch_rx } = channels;

    // Overlay state
    let mut overlay_state = overlay::OverlayState::new();

    // Main thread: render + display
    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();
    let mut display_fps: u32;
    let mut last_batch: Option<TrajectoryBatch> = None;
    let mut needs_redraw = true;

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---

        // Escape: close panel first, then quit app
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            if overlay_state.visible {
                overlay_state.visible = false;
                status_text = format_status(&params, colormap, false);
                needs_redraw = true;
            } else {
                break;
            }
        }

        // Space: toggle overlay
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            overlay_state.toggle();
            status_text = format_status(&params, colormap, overlay_state.visible);
            needs_redraw = true;
        }

        if overlay_state.visible {
            // Up/Down: navigate parameters
            if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
                overlay_state.navigate(-1);
                needs_redraw = true;
            }
            if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
                overlay_state.navigate(1);
                needs_redraw = true;
            }

            // Left/Right: adjust parameter (normal step)
            if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay_state.selected, -1, false) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, true);
                }
                needs_redraw = true;
            }
            if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay_state.selected, 1, false) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, true);
                }
                needs_redraw = true;
            }

            // Comma/Period: fine adjust
            if window.is_key_pressed(Key::Comma, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay_state.selected, -1, true) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, true);
                }
                needs_redraw = true;
            }
            if window.is_key_pressed(Key::Period, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay_state.selected, 1, true) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, true);
                }
                needs_redraw = true;
            }

            // R: reset selected parameter to default
            if window.is_key_pressed(Key::R, KeyRepeat::No) {
                overlay::reset_param(&mut params, overlay_state.selected);
                let _ = param_tx.send(params.clone());
                status_text = format_status(&params, colormap, true);
                needs_redraw = true;
            }
        } else {
            // Left/Right: rotate the view when the panel is closed
            if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay::ANGLE_PARAM, -1, false) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, false);
                    needs_redraw = true;
                }
            }
            if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
                if overlay::adjust_param(&mut params, overlay::ANGLE_PARAM, 1, false) {
                    let _ = param_tx.send(params.clone());
                    status_text = format_status(&params, colormap, false);
                    needs_redraw = true;
                }
            }
        }

        // C: cycle color map
        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            colormap = colormap.next();
            status_text = format_status(&params, colormap, overlay_state.visible);
            needs_redraw = true;
        }

        // --- Check for window resize ---
        let (new_w, new_h) = window.get_size();
        if new_w != w || new_h != h {
            render_cfg = renderer::RenderConfig::fit(new_w, new_h);
            w = render_cfg.frame_width;
            h = render_cfg.frame_height;
            framebuf = vec![0u32; w * h];
            needs_redraw = true;
        }

        // --- Non-blocking: grab latest batch if available ---
        let mut batch = None;
        while let Ok(b) = batch_rx.try_recv() {
            batch = Some(b);
        }
        if let Some(b) = batch {
            last_batch = Some(b);
            needs_redraw = true;
        }

        if needs_redraw {
            let trajectories: &[Trajectory] = last_batch
                .as_ref()
                .map(|b| b.trajectories.as_slice())
                .unwrap_or(&[]);
            let cam = Camera::new(params.angle);
            renderer::render_into(&mut rgba_buf, trajectories, &render_cfg, &cam, colormap);
            renderer::render_status(&mut rgba_buf, &render_cfg, &status_text);
            overlay::render_overlay(
                &mut rgba_buf,
                render_cfg.frame_width,
                render_cfg.display_width,
                render_cfg.display_height,
                &overlay_state,
                &params,
            );
            rgba_to_argb(&rgba_buf, &mut framebuf);
            needs_redraw = false;
        }

        window.update_with_buffer(&framebuf, w, h).unwrap();

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            display_fps = frame_count;
            frame_count = 0;
            last_fps_time = now;
            window.set_title(&format!("{TITLE} — {display_fps} fps"));
        }
    }

    // Shutdown: closing both channels unblocks the solver thread wherever
    // it is waiting.
    running.store(false, Ordering::SeqCst);
    drop(param_tx);
    drop(batch_rx);
    let _ = solver_thread.join();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_closed_panel() {
        let params = SimParams::default();
        let s = format_status(&params, ColorMap::Viridis, false);
        assert!(s.contains("sigma=10.0"));
        assert!(s.contains("rho=28.0"));
        assert!(s.contains("beta=2.67"));
        assert!(s.contains("n=10"));
        assert!(s.contains("horizon=4.0"));
        assert!(s.contains("angle=0"));
        assert!(s.contains("viridis"));
    }

    #[test]
    fn test_format_status_open_panel() {
        let params = SimParams::default();
        let s = format_status(&params, ColorMap::Viridis, true);
        assert!(s.contains("space=close"));
        assert!(!s.contains("sigma="));
    }

    #[test]
    fn test_rgba_to_argb() {
        let rgba = [0x11, 0x22, 0x33, 0xFF, 0xAA, 0xBB, 0xCC, 0xFF];
        let mut out = [0u32; 2];
        rgba_to_argb(&rgba, &mut out);
        assert_eq!(out[0], 0x0011_2233);
        assert_eq!(out[1], 0x00AA_BBCC);
    }

    #[test]
    fn test_drain_latest_gets_newest() {
        let (tx, rx) = mpsc::sync_channel::<i32>(10);
        for i in 0..3 {
            tx.send(i).unwrap();
        }
        // drain
        let mut latest = rx.recv().unwrap();
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }
        assert_eq!(latest, 2, "Should get the last item sent");
    }

    #[test]
    fn test_pipeline_no_panic() {
        let params = SimParams { trajectories: 4, horizon: 0.5, ..SimParams::default() };
        let batch = solver::generate_batch(&params).unwrap();
        let cfg = renderer::RenderConfig::fit(320, 240);
        let cam = Camera::new(params.angle);

        let mut rgba = Vec::new();
        renderer::render_into(&mut rgba, &batch.trajectories, &cfg, &cam, ColorMap::Viridis);
        renderer::render_status(&mut rgba, &cfg, "test");
        let state = overlay::OverlayState::new();
        overlay::render_overlay(
            &mut rgba,
            cfg.frame_width,
            cfg.display_width,
            cfg.display_height,
            &state,
            &params,
        );

        let mut framebuf = vec![0u32; cfg.frame_width * cfg.frame_height];
        rgba_to_argb(&rgba, &mut framebuf);
        assert_eq!(rgba.len(), cfg.frame_width * cfg.frame_height * 4);
    }

    #[test]
    fn test_solver_thread_recomputes_on_change() {
        let initial = SimParams { trajectories: 2, horizon: 0.2, ..SimParams::default() };
        let (channels, handle) = spawn_solver_thread(initial.clone());
        let SolverChannels { param_tx, batch_rx } = channels;

        let first = batch_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("no initial batch");
        assert_eq!(first.params, initial);
        assert_eq!(first.trajectories.len(), 2);

        let changed = SimParams { trajectories: 3, ..initial };
        param_tx.send(changed.clone()).unwrap();
        let second = batch_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("no recomputed batch");
        assert_eq!(second.params, changed);
        assert_eq!(second.trajectories.len(), 3);

        drop(param_tx);
        drop(batch_rx);
        handle.join().unwrap();
    }
}
