use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use crate::{
    cli::{OutputArgs, ReferenceDataArgs},
    prelude::*,
    processor::Processor,
    tables::{build_heat_rates_table, build_max_emissions_table, build_totals_table},
};

#[derive(Parser)]
pub struct ProcessArgs {
    /// Generation report to process.
    pub input_file: PathBuf,

    #[clap(flatten)]
    pub reference_data: ReferenceDataArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl ProcessArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let processor = Processor::builder()
            .repository(Arc::new(self.output.new_repository()))
            .factors(Arc::new(self.reference_data.load().await?))
            .build();
        let processed = processor
            .process(&self.input_file)
            .await
            .with_context(|| format!("failed to process `{}`", self.input_file.display()))?;

        println!("{}", build_totals_table(&processed.report.totals));
        println!("{}", build_max_emissions_table(&processed.report.max_emissions));
        println!("{}", build_heat_rates_table(&processed.report.heat_rates));
        info!(output_path = %processed.output_path.display(), "done");
        Ok(())
    }
}
