//! Echo command handler

use async_trait::async_trait;
use clap::{Arg, ArgAction};
use subcmdutil_shared::{Args, Command, Context, ExitStatus, FlagSet, Flags};

/// Prints its arguments; finishes immediately, so it needs no teardown
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoCommand;

impl EchoCommand {
    fn render(flags: &Flags) -> String {
        let line = flags
            .get_many::<String>("words")
            .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        if flags.get_flag("upper") {
            line.to_uppercase()
        } else {
            line
        }
    }
}

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn synopsis(&self) -> &str {
        "Print arguments to stdout"
    }

    fn usage(&self) -> &str {
        "echo [--upper] <words>..."
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags
            .arg(
                Arg::new("upper")
                    .long("upper")
                    .action(ArgAction::SetTrue)
                    .help("Uppercase the output"),
            )
            .arg(Arg::new("words").num_args(0..).value_name("WORDS"))
    }

    async fn execute(&self, _ctx: Context, flags: Flags, _args: Args) -> ExitStatus {
        println!("{}", Self::render(&flags));
        ExitStatus::Success
    }
}
