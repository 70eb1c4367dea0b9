//! `comlab-admin`: manage the Computer Lab faculty roster from a terminal.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comlab_admin::config::DEFAULT_BASE_URL;
use comlab_admin::logging::init_tracing;
use comlab_admin::qr;
use comlab_admin::roster::{DeleteOutcome, RosterError, RosterViewModel};
use comlab_admin::{ApiConfig, HttpRosterApi, LogFormat};
use comlab_core::view::DEFAULT_PAGE_SIZE;
use comlab_core::{
    Column, DraftSchema, EditDraft, NewTeacherDraft, NoticeLevel, OptionCatalog, RosterApi,
    RosterView, SortDirection, SortState,
};
use tracing::debug;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "comlab-admin", about = "Computer Lab faculty roster administration", version)]
struct Cli {
    /// Roster API root.
    #[arg(long, global = true, env = "COMLAB_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds. Unset uses the HTTP client default.
    #[arg(long, global = true, env = "COMLAB_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Log output format (stderr).
    #[arg(long, global = true, env = "COMLAB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Reject courses, sections and subjects outside the standard options.
    #[arg(long, global = true)]
    strict_options: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of the roster.
    List(ListArgs),
    /// Update a teacher. Fields not given keep their current values.
    Edit {
        teacher_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Add a teacher.
    Add {
        teacher_id: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Initial password.
        #[arg(long, env = "COMLAB_NEW_TEACHER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Delete teachers by identifier.
    Delete {
        #[arg(required = true)]
        teacher_ids: Vec<String>,
    },
    /// Show the QR code of a teacher identifier.
    Qr {
        teacher_id: String,
        /// Write an SVG file instead of printing to the terminal.
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
        /// Minimum SVG edge length in pixels.
        #[arg(long, default_value_t = qr::DEFAULT_SVG_SIZE)]
        size: u32,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive last-name filter.
    #[arg(long, short)]
    filter: Option<String>,
    /// Sort column (id, lastname, firstname, email, subjects, courses, sections).
    #[arg(long, default_value = "lastname")]
    sort: Column,
    /// Sort descending.
    #[arg(long)]
    desc: bool,
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    /// Columns to hide, comma-separated. The last name is always shown.
    #[arg(long, value_delimiter = ',')]
    hide: Vec<Column>,
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    firstname: Option<String>,
    /// Comma-separated.
    #[arg(long, value_delimiter = ',')]
    subjects: Option<Vec<String>>,
    /// Comma-separated.
    #[arg(long, value_delimiter = ',')]
    courses: Option<Vec<String>>,
    /// Comma-separated.
    #[arg(long, value_delimiter = ',')]
    sections: Option<Vec<String>>,
}

impl FieldArgs {
    fn apply(self, draft: &mut EditDraft) {
        if let Some(email) = self.email {
            draft.teacher_email = email;
        }
        if let Some(lastname) = self.lastname {
            draft.lastname = lastname;
        }
        if let Some(firstname) = self.firstname {
            draft.firstname = firstname;
        }
        if let Some(subjects) = self.subjects {
            draft.subjects = subjects;
        }
        if let Some(courses) = self.courses {
            draft.courses = courses;
        }
        if let Some(sections) = self.sections {
            draft.sections = sections;
        }
    }
}

// ============================================================
// Main
// ============================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.log_format, "info") {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ApiConfig {
        base_url: cli.base_url,
        request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
    };
    let api = HttpRosterApi::new(&config).context("invalid roster API configuration")?;
    debug!(base_url = %api.base_url(), "roster API client ready");

    let mut schema = DraftSchema::teacher();
    if cli.strict_options {
        schema = schema.with_catalog(&OptionCatalog::default());
    }
    let mut vm = RosterViewModel::new(api).with_schema(schema);

    let loaded = vm.load().await;
    print_notices(&mut vm);
    loaded.context("could not load the roster")?;

    let result = match cli.command {
        Command::List(args) => {
            list(&mut vm, args);
            Ok(())
        }
        Command::Edit { teacher_id, fields } => edit(&mut vm, &teacher_id, fields).await,
        Command::Add {
            teacher_id,
            fields,
            password,
        } => add(&mut vm, teacher_id, fields, password).await,
        Command::Delete { teacher_ids } => delete(&mut vm, &teacher_ids).await,
        Command::Qr {
            teacher_id,
            svg,
            size,
        } => show_qr(&mut vm, &teacher_id, svg, size),
    };
    print_notices(&mut vm);
    result
}

// ============================================================
// Commands
// ============================================================

fn list<A: RosterApi>(vm: &mut RosterViewModel<A>, args: ListArgs) {
    if let Some(filter) = args.filter {
        vm.set_filter(filter);
    }
    vm.set_sort(SortState {
        column: args.sort,
        direction: if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    });
    vm.set_page_size(args.page_size);
    for column in args.hide {
        if !vm.set_column_visible(column, false) {
            eprintln!("note: the {} column is always shown", column.header());
        }
    }
    vm.go_to_page(args.page.saturating_sub(1));

    if let Some(view) = vm.view() {
        print_table(&view);
    }
}

fn print_table(view: &RosterView<'_>) {
    let widths: Vec<usize> = view
        .columns
        .iter()
        .map(|column| {
            view.rows
                .iter()
                .map(|row| column.text(row.teacher).chars().count())
                .fold(column.header().len(), usize::max)
        })
        .collect();

    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.header()))
        .collect();
    println!("{}", header.join("  ").trim_end());

    if view.rows.is_empty() {
        println!("No results.");
    }
    for row in &view.rows {
        let cells: Vec<String> = view
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{:<width$}", column.text(row.teacher)))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }

    println!();
    println!(
        "Page {} of {} ({} of {} teacher(s) match)",
        if view.page_count == 0 { 0 } else { view.page_index + 1 },
        view.page_count,
        view.filtered_count,
        view.total_count
    );
}

async fn edit<A: RosterApi>(
    vm: &mut RosterViewModel<A>,
    teacher_id: &str,
    fields: FieldArgs,
) -> anyhow::Result<()> {
    let mut draft = vm.begin_edit(teacher_id)?;
    fields.apply(&mut draft);
    vm.submit_edit(draft).await.map_err(report_validation)?;
    Ok(())
}

async fn add<A: RosterApi>(
    vm: &mut RosterViewModel<A>,
    teacher_id: String,
    fields: FieldArgs,
    password: Option<String>,
) -> anyhow::Result<()> {
    let mut draft = NewTeacherDraft {
        fields: EditDraft {
            teacher_id,
            ..EditDraft::default()
        },
        password,
    };
    fields.apply(&mut draft.fields);
    vm.create_teacher(draft).await.map_err(report_validation)?;
    Ok(())
}

async fn delete<A: RosterApi>(
    vm: &mut RosterViewModel<A>,
    teacher_ids: &[String],
) -> anyhow::Result<()> {
    for teacher_id in teacher_ids {
        vm.select(teacher_id)?;
    }
    let confirmation = vm.open_delete_confirm()?;
    println!("{}", confirmation.description());

    let report = vm.delete_selected().await;
    for (teacher_id, outcome) in &report.outcomes {
        match outcome {
            DeleteOutcome::Deleted => println!("  {teacher_id}: deleted"),
            DeleteOutcome::Failed(err) => println!("  {teacher_id}: failed ({err})"),
        }
    }
    if report.all_deleted() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} deletes failed", report.failed_ids().len(), report.attempted())
    }
}

fn show_qr<A: RosterApi>(
    vm: &mut RosterViewModel<A>,
    teacher_id: &str,
    svg: Option<PathBuf>,
    size: u32,
) -> anyhow::Result<()> {
    let payload = vm.show_qr(teacher_id)?.to_string();
    match svg {
        Some(path) => {
            let document = qr::render_svg(&payload, size)?;
            std::fs::write(&path, document)
                .with_context(|| format!("could not write {}", path.display()))?;
            println!("QR code for {payload} written to {}", path.display());
        }
        None => {
            println!("{}", qr::render_terminal(&payload)?);
            println!("{payload}");
        }
    }
    vm.close_qr();
    Ok(())
}

// ============================================================
// Output
// ============================================================

/// Prints field errors under their labels before the error propagates.
fn report_validation(err: RosterError) -> RosterError {
    if let RosterError::Validation(errors) = &err {
        for error in errors {
            eprintln!("  {}: {}", error.field.label(), error.message);
        }
    }
    err
}

fn print_notices<A: RosterApi>(vm: &mut RosterViewModel<A>) {
    for notice in vm.take_notices() {
        match notice.level {
            NoticeLevel::Error => eprintln!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => println!("{}", notice.message),
        }
    }
}
