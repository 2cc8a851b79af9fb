//! The `runway vocab` command.

use clap::Args;
use runway_core::Config;

#[derive(Args, Debug)]
pub struct VocabArgs {
    /// Print as a JSON array instead of one label per line
    #[arg(long)]
    pub json: bool,

    /// Prefix each label with its index
    #[arg(long, conflicts_with = "json")]
    pub numbered: bool,
}

pub fn execute(args: VocabArgs, config: &Config) -> anyhow::Result<()> {
    let vocabulary = config.vocabulary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(vocabulary.labels())?);
    } else {
        for (i, label) in vocabulary.labels().iter().enumerate() {
            if args.numbered {
                println!("{i:>4}  {label}");
            } else {
                println!("{label}");
            }
        }
    }

    eprintln!(
        "{} labels from {} categories (hash {})",
        vocabulary.len(),
        config.taxonomy.categories.categories().len(),
        &vocabulary.content_hash()[..16]
    );
    Ok(())
}
