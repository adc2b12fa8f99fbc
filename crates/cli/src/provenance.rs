use anyhow::{Context, Result};
use gridheight::api::RunSummary;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Data-source attribution required when redistributing swisstopo heights.
pub const ATTRIBUTION: [&str; 3] = [
    "© swisstopo - Swiss Federal Office of Topography",
    "Height data retrieved from api3.geo.admin.ch",
    "Coordinate system: LV95 (EPSG:2056)",
];

/// What a run was asked to do and how it went.
pub struct Payload {
    pub params: Value,
    pub summary: RunSummary,
}

/// Write `<stem>.provenance.json` next to `artifact`: build, callsite, params,
/// run counters, attribution and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let rev = option_env!("GIT_COMMIT").unwrap_or("unknown");
    let s = payload.summary;
    let doc = json!({
        "code_rev": rev,
        "version": gridheight::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "summary": {
            "accepted": s.accepted,
            "lookups": s.lookups,
            "failed": s.failed,
            "success_rate": s.success_rate()
        },
        "attribution": ATTRIBUTION,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("cloud"));
    let mut name = stem;
    name.push(".provenance.json");
    artifact.with_file_name(name)
}
