use anyhow::Result;
use famhub_calendar::{DayTone, WEEKDAY_HEADERS};
use famhub_core::Config;
use famhub_ui::{AppServices, HomeModel, ScheduleModel};

fn main() -> Result<()> {
    famhub_core::init()?;

    let (config, _) = Config::load_validated()?;
    let services = AppServices::init(config)?;
    let client = services.init_client()?;

    tracing::info!("FamHub started");

    let step = services.config().calendar.time_step_minutes;
    let recent = services.config().board.recent_posts;

    let mut calendar = ScheduleModel::new(client.clone(), services.scope(), services.holidays(), step)?;
    let mut home = HomeModel::new(client, services.scope(), recent);
    services.block_on(async {
        calendar.load().await;
        home.load().await;
    });

    print_month(&calendar);
    print_home(&home);

    services.shutdown();
    Ok(())
}

fn print_month(page: &ScheduleModel) {
    println!("{}", page.label());
    let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|d| format!("{:>5}", d.to_string())).collect();
    println!("{}", header.join(""));

    let cells = page.cells();
    let mut line = "     ".repeat(page.grid().leading_blanks() as usize);
    for (i, cell) in cells.iter().enumerate() {
        let mark = match (cell.is_today, cell.has_entries) {
            (true, _) => '>',
            (false, true) => '*',
            (false, false) => ' ',
        };
        let tone = match cell.tone {
            DayTone::Warning => '!',
            DayTone::Weekend => '~',
            DayTone::Default => ' ',
        };
        line.push_str(&format!("{}{:>2}{} ", mark, cell.day.day, tone));
        let column = page.grid().leading_blanks() as usize + i + 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    println!("  > today  * has schedule  ! Sunday/holiday  ~ Saturday\n");
}

fn print_home(home: &HomeModel) {
    println!("Notices");
    for member in home.members() {
        let notice = home.notice_for(&member.id);
        if !notice.is_empty() {
            println!("  {}: {}", member.name, notice);
        }
    }

    println!("\nRecent posts");
    for post in home.recent_posts() {
        println!(
            "  {} ({}, {})",
            post.title,
            home.author_name(&post.author_id),
            post.created_at.format("%Y-%m-%d")
        );
    }

    let week = home.week();
    println!("\nThis week ({} ~ {})", week.start, week.end);
    for entry in home.week_schedules() {
        let today = if home.is_today(entry) { " <- today" } else { "" };
        println!(
            "  {} {:>7}  {} [{}]{}",
            entry.date,
            entry.time.label(),
            entry.title,
            home.author_name(&entry.author_id),
            today
        );
    }
}
