use clap::Parser;
use hamzapoint::model::{Component, DiacriticModel};
use hamzapoint::predict::Predictor;

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    text: String,
    #[clap(long, short)]
    model: String,
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let model = DiacriticModel::new(opts.model).unwrap();
    let predictor = Predictor::new(model);

    // Output is unshaped; pipe through a bidi shaper for terminal display.
    println!("{}", predictor.predict(&opts.text));
}
