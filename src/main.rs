//! Host-side helper.
//!
//! * `mapview serve` builds the WASM bundle into `static/pkg` and serves
//!   `static/` on port 8000.
//! * `mapview inspect <fragment> [--slash] [--config FILE]` prints what the
//!   page would start from for a given URL fragment.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    host::init_tracing();
    if let Err(e) = host::run(std::env::args().skip(1).collect()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};
    use std::{fs, thread, time::Duration};

    use mapview_wasm::{DemoConfig, HashFormat, HashSync};
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;

    const PORT: &str = "8000";

    pub fn init_tracing() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    fn usage() -> String {
        "usage:\n  mapview serve\n  mapview inspect <fragment> [--slash] [--config FILE]"
            .to_string()
    }

    pub fn run(args: Vec<String>) -> Result<(), String> {
        match args.first().map(String::as_str) {
            None | Some("serve") => serve(),
            Some("inspect") => inspect(&args[1..]),
            Some(_) => Err(usage()),
        }
    }

    fn inspect(args: &[String]) -> Result<(), String> {
        let mut fragment: Option<&str> = None;
        let mut format: Option<HashFormat> = None;
        let mut config_path: Option<&str> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--slash" => format = Some(HashFormat::Slash),
                "--config" => {
                    i += 1;
                    let path = args
                        .get(i)
                        .ok_or_else(|| "--config requires a value".to_string())?;
                    config_path = Some(path.as_str());
                }
                s if s.starts_with("--") => {
                    return Err(format!("unknown arg: {s}\n\n{}", usage()));
                }
                s => fragment = Some(s),
            }
            i += 1;
        }

        let config = match config_path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| format!("read {path}: {e}"))?;
                DemoConfig::from_json(&text).map_err(|e| format!("{path}: {e}"))?
            }
            None => DemoConfig::embedded().map_err(|e| e.to_string())?,
        };
        let sync = HashSync::with_format(&config, format.unwrap_or(config.format));

        let parsed = sync.parse(fragment.unwrap_or(""));
        let report = serde_json::json!({
            "state": &parsed.state,
            "mode": parsed.state.mode(),
            "issues": parsed.issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
            "fragment": format!("#{}", sync.serialize(&parsed.state)),
        });
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        Ok(())
    }

    fn serve() -> Result<(), String> {
        info!("building wasm bundle");
        match Command::new("wasm-pack")
            .args([
                "build",
                "--release",
                "--target",
                "web",
                "--out-dir",
                "static/pkg",
            ])
            .status()
        {
            Ok(st) if st.success() => {}
            Ok(_) => return Err("wasm-pack finished with errors".to_string()),
            Err(_) => warn!("wasm-pack not found in PATH; serving existing static/pkg"),
        }

        info!(port = PORT, "serving static/");
        let mut server = Command::new("python3")
            .args(["-m", "http.server", PORT, "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start http server: {e}"))?;
        info!("open http://127.0.0.1:{PORT}/#mapzen,London");

        loop {
            if let Ok(Some(status)) = server.try_wait() {
                return Err(format!("http server exited: {status}"));
            }
            thread::sleep(Duration::from_secs(5));
        }
    }
}
