use clap::Parser;
use hamzapoint::corpus;
use hamzapoint::model::DiacriticModel;

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    corpus_dir: String,
    #[clap(long, short)]
    model: String,
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let texts = corpus::load_corpus(&opts.corpus_dir).unwrap();
    let dataset = corpus::extract_dataset(&texts);

    DiacriticModel::load_or_train(&opts.model, &dataset).unwrap();

    println!(
        "model ready at {} ({} labeled examples in corpus)",
        opts.model,
        dataset.len()
    );
}
