use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use packforge_pack::{
    InMemoryPackStateStore, PackAssembler, PackConfig, PackRequest, PackService, PackState,
};
use packforge_readiness::evaluate_readiness;

const USAGE: &str = "usage: packforge <generate|validate|readiness|zpl> <request.json>";

fn main() -> anyhow::Result<()> {
    packforge_observability::init();

    let mut args = std::env::args().skip(1);
    let (command, path) = match (args.next(), args.next()) {
        (Some(command), Some(path)) => (command, PathBuf::from(path)),
        (Some(path), None) => ("generate".to_string(), PathBuf::from(path)),
        _ => bail!(USAGE),
    };

    let config = PackConfig::from_env();
    let request = read_request(&path)?;

    match command.as_str() {
        "generate" => generate(config, &request),
        "validate" => {
            let service = PackService::new(PackAssembler::new(config), InMemoryPackStateStore::new());
            let validation = service.validate(&request);
            println!("{}", serde_json::to_string_pretty(&validation)?);
            Ok(())
        }
        "readiness" => {
            let bundle = &request.bundle;
            let result = evaluate_readiness(
                &bundle.order,
                bundle.identifiers.as_ref(),
                bundle.readiness.as_ref(),
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        "zpl" => {
            let zpl = PackAssembler::new(config)
                .thermal(&request.bundle, request.labels.as_ref())
                .context("failed to produce thermal labels")?;
            print!("{zpl}");
            Ok(())
        }
        other => bail!("unknown command {other:?}; {USAGE}"),
    }
}

fn read_request(path: &Path) -> anyhow::Result<PackRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid pack request in {}", path.display()))
}

fn generate(config: PackConfig, request: &PackRequest) -> anyhow::Result<()> {
    let output_dir = config.output_dir.clone();
    let store = InMemoryPackStateStore::new();
    if let Some(record) = &request.bundle.readiness {
        store
            .insert(PackState::from_readiness(record))
            .context("failed to seed pack state")?;
    }
    let service = PackService::new(PackAssembler::new(config), store);
    let outcome = service.generate(request)?;

    for warning in &outcome.warnings {
        tracing::warn!(%warning, "pack warning");
        eprintln!("warning: {warning}");
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let target = output_dir.join(&outcome.archive.file_name);
    std::fs::write(&target, &outcome.archive.bytes)
        .with_context(|| format!("failed to write {}", target.display()))?;

    tracing::info!(path = %target.display(), version = outcome.version, "pack written");
    println!("{}", target.display());
    Ok(())
}
