use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    opack completions --shell bash > ~/.bash_completion.d/opack\n\n\
                  Generate zsh completions:\n    opack completions --shell zsh > ~/.zfunc/_opack\n\n\
                  Generate fish completions:\n    opack completions --shell fish > ~/.config/fish/completions/opack.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
