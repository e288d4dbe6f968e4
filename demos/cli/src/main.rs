use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use journey_core::{
    format_date_time, format_span, CampaignFilter, DateRange, InMemoryRepository, JourneyStats,
    JourneyTab, JourneyType, Patient, PatientFilter, PatientRepository,
};
use journey_fixtures::{load_fixture_repository, load_repository_str};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "journey=info";

#[derive(Parser, Debug)]
#[command(
    name = "journey-cli",
    about = "Tra cứu hành trình bệnh nhân từ dữ liệu mẫu hoặc file JSON."
)]
struct Cli {
    /// Đường dẫn tới file JSON bệnh nhân; mặc định dùng dữ liệu mẫu đi kèm.
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Liệt kê bệnh nhân khớp bộ lọc.
    List(FilterArgs),
    /// Số liệu tổng hợp trên tập đã lọc.
    Stats(FilterArgs),
    /// Chi tiết một bệnh nhân và các hành trình.
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
    },
    /// Bệnh nhân có cùng mã ngữ cảnh.
    Context { context_id: String },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Tìm theo tên, email, số điện thoại hoặc mã bệnh nhân.
    #[arg(short, long, default_value = "")]
    query: String,
    /// Mã ngữ cảnh, tên hoặc email.
    #[arg(short, long, default_value = "")]
    context: String,
    /// all, prepay, results, guestpay, appointment, awo.
    #[arg(long, default_value = "all")]
    campaign: CampaignFilter,
    /// all, 1d, 3d, 7d, 30d.
    #[arg(long, default_value = "all")]
    since: DateRange,
    /// Mốc tham chiếu cho --since (YYYY-MM-DDTHH:MM:SS); mặc định là hiện tại (UTC).
    #[arg(long)]
    now: Option<NaiveDateTime>,
    /// In kết quả dạng JSON.
    #[arg(long)]
    json: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> PatientFilter {
        PatientFilter {
            query: self.query.clone(),
            context_id: self.context.clone(),
            campaign: self.campaign,
            date_range: self.since,
        }
    }

    fn reference_now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Utc::now().naive_utc())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TabArg {
    All,
    Active,
    Completed,
}

impl From<TabArg> for JourneyTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::All => JourneyTab::All,
            TabArg::Active => JourneyTab::Active,
            TabArg::Completed => JourneyTab::Completed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let repository = load_repository(cli.input.as_deref())?;

    match cli.command {
        Command::List(args) => {
            let matched = args
                .to_filter()
                .apply(repository.patients(), args.reference_now());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            } else if matched.is_empty() {
                println!("No patients found");
            } else {
                for patient in matched {
                    println!("{}", render_patient_line(patient));
                }
            }
        }
        Command::Stats(args) => {
            let matched = args
                .to_filter()
                .apply(repository.patients(), args.reference_now());
            let stats = JourneyStats::compute(matched);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_stats(&stats)?);
            }
        }
        Command::Show { id, tab } => {
            let patient = repository
                .find_by_id(&id)
                .with_context(|| format!("Không tìm thấy bệnh nhân {id}"))?;
            print!("{}", render_patient_detail(patient, tab.into())?);
        }
        Command::Context { context_id } => {
            let matched = repository.find_by_context(&context_id);
            tracing::info!(context = %context_id, matched = matched.len(), "context lookup");
            if matched.is_empty() {
                println!("No patients found");
            }
            for patient in matched {
                println!("{}", render_patient_line(patient));
            }
        }
    }

    Ok(())
}

fn load_repository(input: Option<&Path>) -> anyhow::Result<InMemoryRepository> {
    match input {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {:?}", path))?;
            load_repository_str(&data)
                .with_context(|| format!("Dữ liệu bệnh nhân không hợp lệ trong {:?}", path))
        }
        None => load_fixture_repository().context("Không nạp được dữ liệu mẫu"),
    }
}

fn render_patient_line(patient: &Patient) -> String {
    let context = patient.context_id.as_deref().unwrap_or("-");
    let types: Vec<&str> = JourneyType::ALL
        .into_iter()
        .filter(|kind| patient.has_journey_type(*kind))
        .map(JourneyType::as_str)
        .collect();

    format!(
        "{:<8} {:<18} {:<8} {} journeys ({} active) [{}]",
        patient.id,
        patient.name,
        context,
        patient.journeys.len(),
        patient.active_journey_count(),
        types.join(", ")
    )
}

fn render_stats(stats: &JourneyStats) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Total patients:     {}", stats.total_patients)?;
    writeln!(out, "Total journeys:     {}", stats.total_journeys)?;
    writeln!(out, "Active journeys:    {}", stats.active_journeys)?;
    writeln!(out, "Completed journeys: {}", stats.completed_journeys)?;
    writeln!(out, "Completion rate:    {}%", stats.completion_rate)?;
    for kind in JourneyType::ALL {
        let label = format!("{} journeys:", kind.scheme().badge);
        writeln!(out, "  {label:<22}{}", stats.count_for(kind))?;
    }
    Ok(out)
}

fn render_patient_detail(patient: &Patient, tab: JourneyTab) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{} ({}) {}, {}",
        patient.name, patient.id, patient.age, patient.gender
    )?;
    writeln!(
        out,
        "  {} | {}",
        patient.contact_info.email, patient.contact_info.phone
    )?;
    if let Some(context) = &patient.context_id {
        writeln!(out, "  Context {context}")?;
    }

    let journeys = tab.select(&patient.journeys);
    if journeys.is_empty() {
        writeln!(out, "\n{}", tab.empty_label())?;
        return Ok(out);
    }

    for journey in journeys {
        let (status, _) = journey.status.badge();
        let (done, total) = journey.progress();
        writeln!(
            out,
            "\n[{}] {} | {} | {} | {done}/{total} steps",
            journey.kind.scheme().label,
            journey.name,
            status,
            format_span(journey)
        )?;
        for step in &journey.steps {
            let line = format!(
                "  {} {:<28} {:<16} {}",
                step.status.appearance().icon.glyph(),
                step.name,
                format_date_time(step.timestamp),
                step.details.as_deref().unwrap_or_default()
            );
            writeln!(out, "{}", line.trim_end())?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> InMemoryRepository {
        load_fixture_repository().expect("Không nạp được dữ liệu mẫu")
    }

    #[test]
    fn cli_parses_filter_flags() {
        let cli = Cli::try_parse_from([
            "journey-cli",
            "list",
            "--context",
            "CTX-001",
            "--campaign",
            "results",
            "--since",
            "7d",
            "--now",
            "2023-12-08T12:00:00",
        ])
        .unwrap();

        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        let filter = args.to_filter();
        assert_eq!(filter.context_id, "CTX-001");
        assert_eq!(filter.campaign, CampaignFilter::Only(JourneyType::Results));
        assert_eq!(filter.date_range, DateRange::Last7Days);
        assert_eq!(args.reference_now().to_string(), "2023-12-08 12:00:00");
    }

    #[test]
    fn cli_rejects_unknown_campaign() {
        let result = Cli::try_parse_from(["journey-cli", "stats", "--campaign", "billing"]);
        assert!(result.is_err());
    }

    #[test]
    fn patient_line_lists_journey_types() {
        let repo = fixture();
        let patient = repo.find_by_id("P-1004").unwrap();
        let line = render_patient_line(patient);
        assert!(line.starts_with("P-1004"));
        assert!(line.contains("Jennifer Lee"));
        assert!(line.contains("2 journeys (1 active)"));
        assert!(line.ends_with("[prepay, appointment]"));
    }

    #[test]
    fn stats_report_includes_every_type() {
        let repo = fixture();
        let report = render_stats(&JourneyStats::compute(repo.patients())).unwrap();
        assert!(report.contains("Active journeys:    5"));
        assert!(report.contains("Completed journeys: 4"));
        assert!(report.contains("Completion rate:    40%"));
        assert!(report.contains("AWO journeys:"));
        assert_eq!(report.lines().count(), 5 + JourneyType::ALL.len());
    }

    #[test]
    fn detail_puts_appointments_first_and_shows_empty_tab() {
        let repo = fixture();
        let patient = repo.find_by_id("P-1004").unwrap();

        let all = render_patient_detail(patient, JourneyTab::All).unwrap();
        let appointment = all.find("[Appointment]").unwrap();
        let prepay = all.find("[Pre-Payment]").unwrap();
        assert!(appointment < prepay);
        assert!(all.contains("Reminder Sent"));

        let completed = render_patient_detail(patient, JourneyTab::Completed).unwrap();
        assert!(completed.contains("No completed journeys"));
    }
}
