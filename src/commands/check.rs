//! Validate file references without rendering them

use anyhow::Result;
use serde::Serialize;

use crate::request::{IdentityResponse, RequestInfo};
use crate::Site;

/// Outcome of checking one path
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check every path, collecting a report per path
pub fn check_paths(site: &Site, paths: &[String]) -> Vec<CheckReport> {
    let renderer = site.renderer();
    let request = RequestInfo::new(site.config.context_path.clone());

    paths
        .iter()
        .map(|path| {
            let result = site
                .element(path)
                .and_then(|element| renderer.validate(&request, &IdentityResponse, &element));
            match result {
                Ok(()) => CheckReport {
                    path: path.clone(),
                    ok: true,
                    error: None,
                },
                Err(e) => {
                    tracing::debug!("Invalid reference {}: {}", path, e);
                    CheckReport {
                        path: path.clone(),
                        ok: false,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}

/// Check paths and print the reports; fails when any path is invalid
pub fn run(site: &Site, paths: &[String], json: bool) -> Result<()> {
    let reports = check_paths(site, paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match &report.error {
                None => println!("  ok    {}", report.path),
                Some(e) => println!("  error {} - {}", report.path, e),
            }
        }
    }

    let failed = reports.iter().filter(|r| !r.ok).count();
    if failed > 0 {
        anyhow::bail!("{} of {} references are invalid", failed, reports.len());
    }
    Ok(())
}
