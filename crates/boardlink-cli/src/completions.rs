use clap::CommandFactory;
use clap_complete::{Shell, generate};

pub fn generate_completions(shell: Shell) {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
