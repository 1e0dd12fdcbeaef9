use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use vcs_equilibrium::Examples::vcs_examples::vcs_examples;

pub fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    //
    let task: usize = 0;
    vcs_examples(task);
}
