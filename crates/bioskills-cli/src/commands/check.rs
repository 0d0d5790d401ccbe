use bioskills_core::{Catalog, Config, QuestionSource, QuestionStore, SetLoader};
use clap::Args;

#[derive(Args)]
pub struct CheckArgs {
    /// Catalog id or resource name of the set
    resource: String,
    /// Directory or base URL to load sets from
    #[arg(long)]
    source: Option<String>,
}

pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = match args.source {
        Some(source) => source,
        None => Config::load()?.sets.source,
    };
    let catalog = Catalog::builtin();
    let resource = catalog.resource_for(&args.resource);
    let loader = SetLoader::new(&source);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let records = runtime.block_on(loader.fetch_set(resource))?;

    let mut store = QuestionStore::new();
    store.load(records)?;
    let kind = if catalog.is_calculation(resource) {
        "calculation set"
    } else {
        "set"
    };
    println!("ok: {} questions in {kind} {resource}", store.len());
    Ok(())
}
