//! Rerun-backed renderer (feature `rerun`).
//!
//! Plays the role a `cv::imshow` window would: streams the annotated feed,
//! the labeled detection boxes, and the sensitivity readout to a Rerun
//! viewer, either a spawned native window or a served web viewer.

use std::time::{Duration, Instant};

use rerun as rr;

use crate::annotate::annotated;
use crate::detector::DetectionReport;
use crate::error::{PyroError, PyroResult};
use crate::frame::Frame;
use crate::render::Renderer;

pub struct RerunWebConfig {
    pub bind_ip: String,
    /// Port for hosting the Web Viewer (HTTP).
    ///
    /// Note: Rerun's `WebViewerServerPort::AUTO` picks a random port, which is inconvenient for
    /// demos and remote dev. We default to 9090 (same as the `rerun` CLI).
    pub web_port: u16,
    pub open_browser: bool,
    pub connect_url: Option<String>,
}

impl Default for RerunWebConfig {
    fn default() -> Self {
        Self {
            bind_ip: "0.0.0.0".to_string(),
            web_port: 9090,
            open_browser: true,
            connect_url: None,
        }
    }
}

pub enum RerunViewer {
    Web(RerunWebConfig),
    Native,
}

pub struct RerunRendererConfig {
    pub app_id: String,
    pub entity_path: String,
    pub viewer: RerunViewer,
}

impl Default for RerunRendererConfig {
    fn default() -> Self {
        Self {
            app_id: "pyrowatch".to_string(),
            entity_path: "camera".to_string(),
            viewer: RerunViewer::Web(RerunWebConfig::default()),
        }
    }
}

pub struct RerunRenderer {
    rec: rr::RecordingStream,
    // The Rerun gRPC server + web-viewer server require a Tokio runtime.
    // Keep it alive for the whole lifetime of the renderer.
    _tokio_rt: Option<tokio::runtime::Runtime>,
    entity_path: String,
    frame_index: i64,
    logged_frames: u64,
    last_stats: Instant,
}

impl RerunRenderer {
    pub fn new(config: RerunRendererConfig) -> PyroResult<Self> {
        match config.viewer {
            RerunViewer::Web(web) => {
                // Rerun's serving utilities rely on a Tokio runtime existing in the current
                // context. We create one dedicated runtime for this renderer and keep it alive.
                let rt = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| PyroError::Render(format!("failed to create tokio runtime: {e}")))?;

                // Temporarily enter the runtime so rerun can spawn background tasks.
                let _guard = rt.enter();

                let rec = rr::RecordingStreamBuilder::new(config.app_id.clone())
                    .serve_grpc()
                    .map_err(rerun_err)?;

                // The URL the browser will use to fetch data (via the /proxy endpoint).
                // Default is 127.0.0.1 which is perfect when the browser is on the same machine,
                // but for a remote dev environment you may need to override this
                // (or port-forward the gRPC proxy port).
                let connect_to = web.connect_url.unwrap_or_else(|| {
                    if web.bind_ip != "0.0.0.0" {
                        format!(
                            "rerun+http://{}:{}/proxy",
                            web.bind_ip,
                            rr::DEFAULT_SERVER_PORT
                        )
                    } else {
                        rr::DEFAULT_CONNECT_URL.to_string()
                    }
                });

                let web_server = rr::serve_web_viewer(rr::web_viewer::WebViewerConfig {
                    bind_ip: web.bind_ip.clone(),
                    web_port: re_web_viewer_server::WebViewerServerPort(web.web_port),
                    open_browser: web.open_browser,
                    connect_to: vec![connect_to.clone()],
                    ..Default::default()
                })
                .map_err(rerun_err)?;

                eprintln!("rerun: gRPC /proxy connect URL: {connect_to}");
                eprintln!("rerun: web viewer served at: {}", web_server.server_url());
                web_server.detach();

                eprintln!(
                    "rerun: renderer starting (viewer=web, entity_path='{}')",
                    config.entity_path
                );

                Ok(Self {
                    rec,
                    _tokio_rt: Some(rt),
                    entity_path: config.entity_path,
                    frame_index: 0,
                    logged_frames: 0,
                    last_stats: Instant::now(),
                })
            }
            RerunViewer::Native => {
                let rec = rr::RecordingStreamBuilder::new(config.app_id.clone())
                    .spawn()
                    .map_err(rerun_err)?;

                eprintln!(
                    "rerun: renderer starting (viewer=native, entity_path='{}')",
                    config.entity_path
                );

                Ok(Self {
                    rec,
                    _tokio_rt: None,
                    entity_path: config.entity_path,
                    frame_index: 0,
                    logged_frames: 0,
                    last_stats: Instant::now(),
                })
            }
        }
    }

    /// Get the underlying RecordingStream for advanced usage
    pub fn recording_stream(&self) -> &rr::RecordingStream {
        &self.rec
    }
}

impl Renderer for RerunRenderer {
    fn show(&mut self, frame: &Frame, report: &DetectionReport) -> PyroResult<()> {
        self.rec.set_time_sequence("frame", self.frame_index);
        self.frame_index += 1;

        let canvas = annotated(&frame.to_rgb_image(), &report.regions);
        let (w, h) = canvas.dimensions();
        self.rec
            .log(
                self.entity_path.as_str(),
                &rr::Image::from_rgb24(canvas.into_raw(), [w, h]),
            )
            .map_err(rerun_err)?;

        let mins: Vec<(f32, f32)> = report
            .regions
            .iter()
            .map(|r| (r.x as f32, r.y as f32))
            .collect();
        let sizes: Vec<(f32, f32)> = report
            .regions
            .iter()
            .map(|r| (r.width as f32, r.height as f32))
            .collect();
        let labels: Vec<String> = report.regions.iter().map(|r| r.label()).collect();
        let colors: Vec<rr::Color> = report
            .regions
            .iter()
            .map(|r| {
                let [red, green, blue] = r.category.color();
                rr::Color::from_rgb(red, green, blue)
            })
            .collect();
        self.rec
            .log(
                format!("{}/regions", self.entity_path),
                &rr::Boxes2D::from_mins_and_sizes(mins, sizes)
                    .with_labels(labels)
                    .with_colors(colors),
            )
            .map_err(rerun_err)?;

        self.rec
            .log(
                format!("{}/sensitivity", self.entity_path),
                &rr::TextDocument::new(format!("Sensitivity: {:.1}", report.sensitivity)),
            )
            .map_err(rerun_err)?;
        self.rec
            .log(
                format!("{}/sensitivity_series", self.entity_path),
                &rr::Scalars::single(report.sensitivity as f64),
            )
            .map_err(rerun_err)?;

        self.logged_frames += 1;
        if self.last_stats.elapsed() >= Duration::from_secs(2) {
            eprintln!(
                "rerun: stats: logged={} last_frame={}x{} regions={}",
                self.logged_frames,
                frame.width,
                frame.height,
                report.regions.len()
            );
            self.last_stats = Instant::now();
        }

        Ok(())
    }
}

fn rerun_err(err: impl std::fmt::Display) -> PyroError {
    PyroError::Render(format!("rerun error: {}", err))
}
