//! Generate command CLI wrapper
//!
//! Decides the input source once, builds the immutable configuration and
//! delegates to GenerateOperation for the actual work.

use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::cli::GenerateArgs;
use crate::config::{GenerateConfig, InputSource, ProjectFile};
use crate::error::{self, Result};
use crate::operations::GenerateOperation;
use crate::ui::{ConsoleReporter, SilentReporter, StatusReporter};

/// Run generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let current_dir = std::env::current_dir()
        .map_err(|e| error::io_error(format!("Failed to get current directory: {e}")))?;
    let piped = stdin_is_piped();

    let config = build_config(args, &current_dir, piped)?;
    tracing::debug!(?config, "resolved configuration");

    let stream = if piped { Some(read_stdin()?) } else { None };

    let mut reporter: Box<dyn StatusReporter> = if config.show_progress() {
        Box::new(ConsoleReporter::new(std::io::stdout()))
    } else {
        Box::new(SilentReporter)
    };
    let mut stdout = std::io::stdout().lock();

    GenerateOperation::new(&config).execute(stream.as_deref(), &mut stdout, reporter.as_mut())?;
    Ok(())
}

/// Turn parsed arguments into a validated configuration
///
/// Reads only the project file; nothing is written.
fn build_config(args: GenerateArgs, project_dir: &Path, piped: bool) -> Result<GenerateConfig> {
    let project = ProjectFile::load(project_dir)?;
    let fallback_name = project_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    GenerateConfig::builder()
        .package_name(args.package)
        .project(project)
        .fallback_package_name(fallback_name)
        .version(args.version)
        .from_version(args.from_version)
        .input(InputSource {
            piped,
            deploy_dir: args.deploy_dir,
            crds_dir: args.crds_dir,
        })
        .input_dir(args.input_dir)
        .kustomize_dir(args.kustomize_dir)
        .output_dir(args.output_dir)
        .stdout(args.stdout)
        .channel_name(args.channel)
        .default_channel(args.default_channel)
        .update_objects(args.update_objects)
        .quiet(args.quiet)
        .build()
}

/// Stdin carries manifests only when it is a pipe or a redirected file
///
/// Terminals and other character devices such as `/dev/null` are not input.
#[cfg(unix)]
fn stdin_is_piped() -> bool {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return false;
    }
    let Ok(fd) = stdin.as_fd().try_clone_to_owned() else {
        return false;
    };
    std::fs::File::from(fd)
        .metadata()
        .is_ok_and(|meta| meta.file_type().is_fifo() || meta.file_type().is_file())
}

#[cfg(not(unix))]
fn stdin_is_piped() -> bool {
    !std::io::stdin().is_terminal()
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut buffer)
        .map_err(|e| error::io_error(format!("Failed to read stdin: {e}")))?;
    Ok(buffer)
}
