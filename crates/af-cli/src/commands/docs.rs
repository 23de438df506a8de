//! Docs command implementation - regenerate and serve the data docs

use anyhow::Result;
use af_checks::build_data_docs;

use crate::cli::{DocsArgs, GlobalArgs};
use crate::commands::common::{load_config, target_dir};

/// Execute the docs command.
pub async fn execute(args: &DocsArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;
    let store = target_dir(&config, &root);

    let summary = build_data_docs(&store)?;
    println!(
        "Data docs generated: {} suites, {} runs ({})",
        summary.suites,
        summary.runs,
        summary.index_path.display()
    );

    if args.serve {
        #[cfg(feature = "docs-serve")]
        {
            serve::execute(args, store.join("docs")).await?;
        }
        #[cfg(not(feature = "docs-serve"))]
        {
            anyhow::bail!("This build was compiled without the docs-serve feature");
        }
    }

    Ok(())
}

#[cfg(feature = "docs-serve")]
mod serve {
    use anyhow::{Context, Result};
    use axum::extract::{Path as UrlPath, State};
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use crate::cli::DocsArgs;

    /// Serve the generated site directory over HTTP.
    pub(super) async fn execute(args: &DocsArgs, site_dir: PathBuf) -> Result<()> {
        let state = Arc::new(site_dir);
        let app = Router::new()
            .route("/", get(index_handler))
            .route("/{file}", get(file_handler))
            .with_state(state);

        let addr: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .context("Invalid host:port")?;

        println!("Serving data docs at http://{}", addr);

        if !args.no_browser {
            let url = format!("http://{}", addr);
            if open::that(&url).is_err() {
                eprintln!("Could not open browser automatically. Visit: {}", url);
            }
        }

        println!("Press Ctrl+C to stop.\n");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;
        axum::serve(listener, app)
            .await
            .context("HTTP server error")?;

        Ok(())
    }

    async fn index_handler(State(site_dir): State<Arc<PathBuf>>) -> impl IntoResponse {
        serve_file(&site_dir, "index.html")
    }

    async fn file_handler(
        State(site_dir): State<Arc<PathBuf>>,
        UrlPath(file): UrlPath<String>,
    ) -> impl IntoResponse {
        serve_file(&site_dir, &file)
    }

    fn serve_file(site_dir: &Path, file: &str) -> axum::response::Response {
        // Single-segment file names only; no traversal
        if file.contains("..") || file.contains('/') || file.contains('\\') {
            return StatusCode::NOT_FOUND.into_response();
        }

        match std::fs::read(site_dir.join(file)) {
            Ok(bytes) => {
                let mime = mime_guess::from_path(file).first_or_octet_stream();
                ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
            }
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        }
    }
}
