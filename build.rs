use anyhow::Result;
use vergen_gix::{BuildBuilder, CargoBuilder, Emitter};

fn main() -> Result<()> {
    let build = BuildBuilder::default().build_date(true).build()?;
    let cargo = CargoBuilder::default().target_triple(true).build()?;
    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .emit()
}
