use clap::{Parser as ClapParser, Subcommand};
use lox_expr::ast::AstPrinter;
use lox_expr::config::Config;
use lox_expr::error::{Diagnostic, LoxError};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    author,
    version,
    about = "Lox expression interpreter",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Script to run; starts an interactive prompt when omitted
    script: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a script
    Tokens {
        script: PathBuf,
        /// Emit JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
    /// Print the parsed expression tree of a script
    Ast {
        script: PathBuf,
        /// Emit JSON instead of the parenthesized form
        #[arg(long)]
        json: bool,
    },
    /// Manage the interpreter configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with defaults for the current environment
    Init,
    /// Print the config file location
    Path,
}

/// Exit status for command-line misuse, following sysexits.h.
const USAGE_EXIT: u8 = 64;

fn read_source(path: &Path) -> Result<String, LoxError> {
    if !path.is_file() {
        return Err(LoxError::FileNotFound(format!(
            "Script not found: {}",
            path.display()
        )));
    }

    Ok(fs::read_to_string(path)?)
}

fn run_file(path: &Path, config: &Config) -> Result<(), LoxError> {
    let source = read_source(path)?;

    if config.print_ast {
        let expr = lox_expr::compile(&source, config.debug)?;
        println!("{}", AstPrinter::print(&expr));
    } else {
        let value = lox_expr::run(&source, config.debug)?;
        println!("{}", value);
    }

    Ok(())
}

fn run_prompt(config: &Config) -> Result<(), LoxError> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", config.prompt);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        let result = if config.print_ast {
            lox_expr::compile(&line, config.debug).map(|expr| AstPrinter::print(&expr))
        } else {
            lox_expr::run(&line, config.debug).map(|value| value.to_string())
        };

        // Errors end the current line only
        match result {
            Ok(output) => println!("{}", output),
            Err(err) => report(&err, &mut io::stdout(), &mut io::stderr())?,
        }
    }
}

fn print_tokens(path: &Path, json: bool) -> Result<(), LoxError> {
    let source = read_source(path)?;
    let (tokens, errors) = lox_expr::scan(&source);

    if json {
        let output = serde_json::to_string_pretty(&tokens).map_err(io::Error::from)?;
        println!("{}", output);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(LoxError::Static(errors.into_iter().map(Diagnostic::from).collect()))
    }
}

fn print_ast(path: &Path, json: bool, config: &Config) -> Result<(), LoxError> {
    let source = read_source(path)?;
    let expr = lox_expr::compile(&source, config.debug)?;

    if json {
        let output = serde_json::to_string_pretty(&expr).map_err(io::Error::from)?;
        println!("{}", output);
    } else {
        println!("{}", AstPrinter::print(&expr));
    }

    Ok(())
}

fn manage_config(command: ConfigCommands, config: &Config) -> Result<(), LoxError> {
    match command {
        ConfigCommands::Show => {
            println!("{}", config.to_json()?);
        }
        ConfigCommands::Init => {
            let config_path = Config::get_config_path();
            if config_path.exists() {
                println!("Config file already exists at: {}", config_path.display());
            } else {
                Config::default().save()?;
                println!("Initialized new config file at: {}", config_path.display());
            }
        }
        ConfigCommands::Path => {
            println!("{}", Config::get_config_path().display());
        }
    }

    Ok(())
}

/// Diagnostics and runtime faults are program output and go to `out`;
/// failures to reach the script at all go to `err_out`.
fn report(err: &LoxError, out: &mut impl Write, err_out: &mut impl Write) -> io::Result<()> {
    match err {
        LoxError::Static(_) | LoxError::Runtime(_) => writeln!(out, "{}", err),
        LoxError::FileNotFound(_) | LoxError::IO(_) => writeln!(err_out, "{}", err),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            // Help and version requests are not usage errors
            let _ = err.print();
            return ExitCode::from(USAGE_EXIT);
        }
        Err(err) => err.exit(),
    };
    let config = Config::load();

    if config.debug {
        eprintln!("[debug] environment: {}", config.env_name);
    }

    let result = match (cli.command, cli.script) {
        (Some(Commands::Tokens { script, json }), _) => print_tokens(&script, json),
        (Some(Commands::Ast { script, json }), _) => print_ast(&script, json, &config),
        (Some(Commands::Config { command }), _) => manage_config(command, &config),
        (None, Some(script)) => run_file(&script, &config),
        (None, None) => run_prompt(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report(&err, &mut io::stdout(), &mut io::stderr());
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reported(err: &LoxError) -> (String, String) {
        let (mut out, mut err_out) = (Vec::new(), Vec::new());
        report(err, &mut out, &mut err_out).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err_out).unwrap())
    }

    #[test]
    fn diagnostics_go_to_stdout() {
        let err = lox_expr::run("(1 + 2", false).unwrap_err();
        assert_eq!(
            reported(&err),
            ("[line 1] Error at end: Expect ')' after expression.\n".to_string(), String::new())
        );
    }

    #[test]
    fn runtime_faults_go_to_stdout() {
        let err = lox_expr::run("1 + \"x\"", false).unwrap_err();
        assert_eq!(
            reported(&err),
            ("Operands must be two numbers or two strings.\n[line 1]\n".to_string(), String::new())
        );
    }

    #[test]
    fn missing_script_goes_to_stderr() {
        let err = read_source(Path::new("does/not/exist.lox")).unwrap_err();
        let (out, err_out) = reported(&err);
        assert!(out.is_empty());
        assert!(err_out.starts_with("FileNotFoundError: Script not found"));
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn extra_arguments_are_a_usage_error() {
        let err = Cli::try_parse_from(["lox", "a.lox", "b.lox"]).err().unwrap();
        assert!(err.use_stderr());
    }

    #[test]
    fn help_is_not_a_usage_error() {
        let err = Cli::try_parse_from(["lox", "--help"]).err().unwrap();
        assert!(!err.use_stderr());
    }

    #[test]
    fn single_script_and_subcommands_parse() {
        let cli = Cli::try_parse_from(["lox", "a.lox"]).ok().unwrap();
        assert_eq!(cli.script, Some(PathBuf::from("a.lox")));
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["lox", "tokens", "a.lox", "--json"]).ok().unwrap();
        assert!(matches!(cli.command, Some(Commands::Tokens { json: true, .. })));
    }
}
