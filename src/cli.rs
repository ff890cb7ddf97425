use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use httpseekr::Whence;
use log::LevelFilter;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::ffi::OsString;
use std::path::PathBuf;
use url::Url;

use crate::info_cmd;
use crate::read_cmd;
use crate::string_utils::*;
use crate::PKG_NAME;
use crate::PKG_VERSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOpts {
    pub filter: LevelFilter,
}

impl LogOpts {
    fn new(filter: LevelFilter) -> Self {
        Self { filter }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOpts {
    Info(info_cmd::Options),
    Read(read_cmd::Options),
}

pub fn parse_opts<I, T>(args: I) -> Result<(CommandOpts, LogOpts), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let info_subcmd = add_http_args(
        Command::new("info")
            .about("Print details of a remote resource")
            .arg(input_url_arg()),
    );

    let read_subcmd = add_http_args(
        Command::new("read")
            .about("Read a range of bytes from a remote resource")
            .arg(input_url_arg())
            .arg(
                Arg::new("offset")
                    .long("offset")
                    .value_name("OFFSET")
                    .value_parser(value_parser!(i64))
                    .allow_negative_numbers(true)
                    .default_value("0")
                    .help("Offset to seek to before reading"),
            )
            .arg(
                Arg::new("whence")
                    .long("whence")
                    .value_name("ORIGIN")
                    .value_parser(["start", "current", "end"])
                    .default_value("start")
                    .help("Seek origin, 'end' seeks offset bytes back from the end"),
            )
            .arg(
                Arg::new("length")
                    .short('n')
                    .long("length")
                    .value_name("SIZE")
                    .value_parser(parse_human_size)
                    .help("Number of bytes to read, reads to the end if not given"),
            )
            .arg(
                Arg::new("block-size")
                    .long("block-size")
                    .value_name("SIZE")
                    .value_parser(parse_human_size)
                    .default_value("0")
                    .help("Fetch and cache whole blocks of this size (0 disables caching)"),
            )
            .arg(
                Arg::new("OUTPUT")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Output file, if none is given stdout is used"),
            ),
    );

    let mut cmd = Command::new(PKG_NAME)
        .version(PKG_VERSION)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Set verbosity level"),
        )
        .subcommand(info_subcmd)
        .subcommand(read_subcmd);

    let matches = cmd.try_get_matches_from_mut(args)?;
    let log_opts = LogOpts::new(match matches.get_count("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    if let Some(matches) = matches.subcommand_matches("info") {
        Ok((
            CommandOpts::Info(info_cmd::Options {
                input: parse_input_url(matches),
                headers: parse_http_headers(&mut cmd, matches)?,
            }),
            log_opts,
        ))
    } else if let Some(matches) = matches.subcommand_matches("read") {
        let whence = match matches.get_one::<String>("whence").map(String::as_str) {
            Some("current") => Whence::Current,
            Some("end") => Whence::End,
            _ => Whence::Start,
        };
        Ok((
            CommandOpts::Read(read_cmd::Options {
                input: parse_input_url(matches),
                headers: parse_http_headers(&mut cmd, matches)?,
                offset: *matches.get_one::<i64>("offset").unwrap(),
                whence,
                length: matches.get_one::<u64>("length").copied(),
                block_size: *matches.get_one::<u64>("block-size").unwrap(),
                output: matches.get_one::<PathBuf>("OUTPUT").cloned(),
            }),
            log_opts,
        ))
    } else {
        unreachable!()
    }
}

fn parse_input_url(matches: &ArgMatches) -> Url {
    matches.get_one::<Url>("URL").unwrap().clone()
}

fn parse_http_headers(cmd: &mut Command, matches: &ArgMatches) -> Result<HeaderMap, clap::Error> {
    let mut headers = HeaderMap::new();
    if let Some(values) = matches.get_many::<String>("http-header") {
        for header in values {
            let mut split = header.splitn(2, ':');
            let name = split.next().unwrap().trim();
            let value = split
                .next()
                .ok_or_else(|| cmd.error(ErrorKind::ValueValidation, "Missing header value"))?
                .trim();
            headers.append(
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|err| cmd.error(ErrorKind::ValueValidation, err))?,
                HeaderValue::from_str(value)
                    .map_err(|err| cmd.error(ErrorKind::ValueValidation, err))?,
            );
        }
    }
    Ok(headers)
}

fn add_http_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("http-header")
            .long("http-header")
            .value_name("HEADER")
            .action(ArgAction::Append)
            .help("Provide custom http header(s)"),
    )
}

fn input_url_arg() -> Arg {
    Arg::new("URL")
        .value_name("URL")
        .value_parser(value_parser!(Url))
        .help("Url of the remote resource")
        .required(true)
}
