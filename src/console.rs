//! Line-oriented front end for the resident table.
//!
//! Each input line is one [`Command`]. The event loop multiplexes stdin,
//! finished list fetches and the controller's next timer deadline.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::controller::notice::{Notice, NoticeKind};
use crate::controller::query::FilterDimension;
use crate::controller::{FetchOutcome, FetchTicket, ListQueryController, ListSnapshot, LoadStatus};
use crate::domain::dashboard::{DashboardOverview, DensityMap};
use crate::domain::lansia::LansiaDetail;
use crate::domain::types::{LansiaId, PageSize, SortField};
use crate::forms::lansia::LansiaForm;
use crate::forms::upload::UploadSpreadsheetForm;
use crate::repository::{
    AuthGateway, DashboardReader, LansiaReader, LansiaWriter, SpreadsheetTransfer,
};
use crate::services::dashboard as dashboard_service;
use crate::services::upload as upload_service;

const HELP: &str = "\
Perintah:
  search <teks>              cari nama atau NIK (kosong untuk menghapus)
  gender|age|rw <nilai|all>  saring data
  sort <kolom>               urutkan (nama_lengkap, nik, jenis_kelamin, usia, rt, rw)
  page <n> | next | prev     pindah halaman
  size <10|25|50>            jumlah baris per halaman
  select <id> | unselect <id> | select-all | unselect-all
  delete <id> | delete-selected, lalu y/n
  show <id> | close          lihat / tutup detail
  edit <id> kolom=nilai ...  ubah data
  add kolom=nilai ...        tambah data
  upload <file.xlsx>         impor data dari Excel
  template [path]            unduh template input
  stats | need <jenis> | density
  dismiss                    tutup notifikasi
  list | reset | help | quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Perintah kosong")]
    Empty,
    #[error("Perintah tidak dikenal: {0}")]
    Unknown(String),
    #[error("Argumen {0} wajib diisi")]
    MissingArgument(&'static str),
    #[error("Argumen tidak valid: {0}")]
    InvalidArgument(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Filter(FilterDimension, String),
    Sort(SortField),
    Page(usize),
    Next,
    Prev,
    Size(PageSize),
    Select(LansiaId),
    Unselect(LansiaId),
    SelectAll,
    UnselectAll,
    Delete(LansiaId),
    DeleteSelected,
    Confirm(bool),
    Show(LansiaId),
    Close,
    Edit(LansiaId, Vec<(String, String)>),
    Add(Vec<(String, String)>),
    Upload(PathBuf),
    Template(Option<PathBuf>),
    Stats,
    Need(String),
    Density,
    Dismiss,
    List,
    Reset,
    Help,
    Quit,
}

fn parse_arg<T: FromStr>(value: Option<&str>, name: &'static str) -> Result<T, CommandError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(CommandError::MissingArgument(name))?;
    value
        .parse()
        .map_err(|_| CommandError::InvalidArgument(value.to_string()))
}

/// Splits `key=value` pairs. Words without `=` extend the previous value, so
/// `nama_lengkap=Siti Aminah rw=05` yields two pairs.
fn parse_pairs(rest: &str) -> Result<Vec<(String, String)>, CommandError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in rest.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                pairs.push((key.to_string(), value.to_string()));
            }
            _ => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(CommandError::InvalidArgument(word.to_string())),
            },
        }
    }
    Ok(pairs)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = (!rest.is_empty()).then_some(rest);

        let command = match name {
            "search" => Command::Search(rest.to_string()),
            "gender" | "age" | "rw" => {
                let dimension = name.parse::<FilterDimension>()?;
                let value = arg.ok_or(CommandError::MissingArgument("nilai"))?;
                Command::Filter(dimension, value.to_string())
            }
            "sort" => Command::Sort(parse_arg(arg, "kolom")?),
            "page" => Command::Page(parse_arg(arg, "halaman")?),
            "next" => Command::Next,
            "prev" => Command::Prev,
            "size" => {
                let size: usize = parse_arg(arg, "jumlah")?;
                let size = PageSize::try_from(size)
                    .map_err(|_| CommandError::InvalidArgument(size.to_string()))?;
                Command::Size(size)
            }
            "select" => Command::Select(parse_arg(arg, "id")?),
            "unselect" => Command::Unselect(parse_arg(arg, "id")?),
            "select-all" => Command::SelectAll,
            "unselect-all" => Command::UnselectAll,
            "delete" => Command::Delete(parse_arg(arg, "id")?),
            "delete-selected" => Command::DeleteSelected,
            "y" | "ya" => Command::Confirm(true),
            "n" | "tidak" => Command::Confirm(false),
            "show" => Command::Show(parse_arg(arg, "id")?),
            "close" | "tutup" => Command::Close,
            "edit" => {
                let (id, fields) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Edit(parse_arg(Some(id), "id")?, parse_pairs(fields)?)
            }
            "add" => Command::Add(parse_pairs(rest)?),
            "upload" => Command::Upload(PathBuf::from(
                arg.ok_or(CommandError::MissingArgument("file"))?,
            )),
            "template" => Command::Template(arg.map(PathBuf::from)),
            "stats" => Command::Stats,
            "need" => Command::Need(arg.ok_or(CommandError::MissingArgument("jenis"))?.to_string()),
            "density" => Command::Density,
            "dismiss" => Command::Dismiss,
            "list" => Command::List,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

impl From<crate::domain::types::TypeConstraintError> for CommandError {
    fn from(err: crate::domain::types::TypeConstraintError) -> Self {
        CommandError::InvalidArgument(err.to_string())
    }
}

fn dash(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or("-")
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("[OK] {}", notice.message),
        NoticeKind::Error => format!("[!] {}", notice.message),
    }
}

/// Renders the table, its footer and the active notice.
pub fn render(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();
    let query = &snapshot.query;

    let status = match snapshot.status {
        LoadStatus::Idle => "",
        LoadStatus::Loading { initial: true } => " (memuat...)",
        LoadStatus::Loading { initial: false } => " (memperbarui...)",
    };
    let _ = writeln!(
        out,
        "Data Lansia{status}  cari: {}  gender: {}  usia: {}  rw: {}  urut: {} {}",
        dash(Some(query.search_term.as_str())),
        query.gender.as_deref().unwrap_or("all"),
        query.age_group.as_deref().unwrap_or("all"),
        query.rw.as_deref().unwrap_or("all"),
        query.sort_field,
        query.sort_direction,
    );

    let select_all = if snapshot.selection.all_selected() { "[x]" } else { "[ ]" };
    let _ = writeln!(
        out,
        "{select_all} {:>4}  {:<28} {:<16} {:<10} {:>4}  RT/RW",
        "ID", "Nama Lengkap", "NIK", "JK", "Usia"
    );

    if snapshot.page.records.is_empty() {
        let _ = writeln!(out, "    Tidak ada data");
    }
    for record in &snapshot.page.records {
        let mark = if snapshot.selection.contains(record.id) { "[x]" } else { "[ ]" };
        let usia = record
            .usia
            .map(|usia| usia.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{mark} {:>4}  {:<28} {:<16} {:<10} {:>4}  {}/{}",
            record.id,
            record.nama_lengkap,
            record.nik,
            record.jenis_kelamin,
            usia,
            dash(record.rt.as_deref()),
            dash(record.rw.as_deref()),
        );
    }

    let strip: Vec<String> = snapshot
        .page
        .page_strip()
        .into_iter()
        .map(|page| match page {
            Some(page) if page == snapshot.page.page => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => "...".to_string(),
        })
        .collect();
    let _ = writeln!(
        out,
        "{}  |  {}  |  {}  |  {} per halaman",
        snapshot.page.window_label(),
        snapshot.page.position_label(),
        strip.join(" "),
        query.page_size,
    );

    if !snapshot.selection.is_empty() {
        let _ = writeln!(out, "{} data dipilih", snapshot.selection.len());
    }
    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "{}", render_notice(notice));
    }
    out
}

pub fn render_detail(detail: &LansiaDetail) -> String {
    let mut out = String::new();
    let personal = &detail.personal;
    let _ = writeln!(out, "#{} {}", detail.id, personal.nama_lengkap);
    let _ = writeln!(out, "  NIK            : {}", personal.nik);
    let _ = writeln!(out, "  Jenis kelamin  : {}", personal.jenis_kelamin);
    let _ = writeln!(
        out,
        "  Tanggal lahir  : {}",
        personal
            .tanggal_lahir
            .map(|date| date.format("%d-%m-%Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(
        out,
        "  Usia           : {} ({})",
        detail.usia.map(|usia| usia.to_string()).unwrap_or_else(|| "-".into()),
        dash(detail.kelompok_usia.as_deref())
    );
    let _ = writeln!(
        out,
        "  Alamat         : {} RT {} / RW {}",
        dash(personal.alamat_lengkap.as_deref()),
        dash(personal.rt.as_deref()),
        dash(personal.rw.as_deref())
    );
    let _ = writeln!(
        out,
        "  Status kawin   : {}",
        dash(personal.status_perkawinan.as_deref())
    );
    if let Some(health) = &detail.kesehatan {
        let _ = writeln!(
            out,
            "  Kesehatan      : {} / gizi {}",
            dash(health.kondisi_kesehatan_umum.as_deref()),
            dash(health.status_gizi.as_deref())
        );
        if let Some(diseases) = health.riwayat_penyakit_kronis.as_ref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  Penyakit kronis: {}", diseases.join(", "));
        }
    }
    if let Some(welfare) = &detail.kesejahteraan {
        let needs = welfare
            .kebutuhan_mendesak
            .as_ref()
            .map(|needs| needs.join(", "))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  Kesejahteraan  : rumah {} / kebutuhan {}",
            dash(welfare.kondisi_rumah.as_deref()),
            dash(Some(needs.as_str()))
        );
    }
    if let Some(companion) = &detail.keluarga {
        let _ = writeln!(
            out,
            "  Pendamping     : {} ({})",
            dash(companion.nama_pendamping.as_deref()),
            dash(companion.hubungan_dengan_lansia.as_deref())
        );
    }
    if let Some(daily_living) = &detail.daily_living {
        let _ = writeln!(
            out,
            "  Skor ADL       : {}",
            daily_living
                .total
                .map(i64::from)
                .unwrap_or_else(|| i64::from(daily_living.computed_total()))
        );
    }
    out
}

pub fn render_overview(overview: &DashboardOverview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total lansia: {}", overview.demographics.total_lansia);
    for entry in &overview.demographics.by_gender {
        let _ = writeln!(out, "  {}: {}", dash(entry.gender.as_deref()), entry.count);
    }
    let _ = writeln!(out, "Kelompok usia:");
    for entry in &overview.demographics.by_age_group {
        let _ = writeln!(out, "  {}: {}", dash(entry.group.as_deref()), entry.count);
    }
    let _ = writeln!(out, "Kondisi kesehatan:");
    for entry in &overview.health.health_conditions {
        let _ = writeln!(out, "  {}: {}", entry.condition, entry.count);
    }
    let _ = writeln!(out, "Kebutuhan mendesak:");
    for entry in &overview.social_welfare.urgent_needs {
        let _ = writeln!(out, "  {}: {}", entry.need, entry.count);
    }
    let _ = writeln!(out, "Partisipasi BKL:");
    for entry in &overview.needs_potential.participation {
        let _ = writeln!(out, "  {}: {}", dash(entry.group.as_deref()), entry.count);
    }
    out
}

pub fn render_density(density: &DensityMap) -> String {
    let mut out = String::new();
    for (rw, count) in density {
        let _ = writeln!(
            out,
            "RW {rw}: {count} lansia  {}",
            dashboard_service::density_fill_color(*count)
        );
    }
    if density.is_empty() {
        out.push_str("Belum ada data kepadatan\n");
    }
    out
}

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Confirmation {
    DeleteOne(LansiaId),
    DeleteSelected,
}

/// Console state around one controller.
pub struct Session<R> {
    controller: ListQueryController<R>,
    template_dir: PathBuf,
    rw_geojson_path: Option<PathBuf>,
    awaiting: Option<Confirmation>,
    issued: Vec<FetchTicket>,
}

impl<R> Session<R>
where
    R: LansiaReader + LansiaWriter + SpreadsheetTransfer + DashboardReader + AuthGateway + 'static,
{
    pub fn new(repo: Arc<R>, template_dir: PathBuf, rw_geojson_path: Option<PathBuf>) -> Self {
        Self {
            controller: ListQueryController::new(repo),
            template_dir,
            rw_geojson_path,
            awaiting: None,
            issued: Vec::new(),
        }
    }

    pub fn controller(&self) -> &ListQueryController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListQueryController<R> {
        &mut self.controller
    }

    /// Fetches due at the end of this turn.
    pub fn take_tickets(&mut self) -> Vec<FetchTicket> {
        let mut tickets = std::mem::take(&mut self.issued);
        tickets.extend(self.controller.flush());
        tickets
    }

    fn issue(&mut self, ticket: Option<FetchTicket>) {
        self.issued.extend(ticket);
    }

    fn edit_fields(
        &mut self,
        form: &mut LansiaForm,
        fields: &[(String, String)],
        now: Instant,
    ) -> bool {
        for (key, value) in fields {
            if let Err(err) = form.set_field(key, value) {
                self.controller
                    .post_notice(NoticeKind::Error, err.to_string(), now);
                return false;
            }
        }
        true
    }

    pub async fn handle(&mut self, command: Command, now: Instant) -> Flow {
        let awaiting = self.awaiting.take();
        let repo = self.controller.repository();

        let reply = match command {
            Command::Confirm(answer) => match (awaiting, answer) {
                (None, _) => "Tidak ada yang perlu dikonfirmasi".to_string(),
                (Some(_), false) => "Dibatalkan".to_string(),
                (Some(Confirmation::DeleteOne(id)), true) => {
                    let ticket = self.controller.delete_one(id, |_| true, now).await;
                    self.issue(ticket);
                    String::new()
                }
                (Some(Confirmation::DeleteSelected), true) => {
                    let ticket = self.controller.delete_selected(|_| true, now).await;
                    self.issue(ticket);
                    String::new()
                }
            },
            Command::Search(text) => {
                self.controller.set_search_text(text, now);
                String::new()
            }
            Command::Filter(dimension, value) => {
                self.controller.set_filter(dimension, &value);
                String::new()
            }
            Command::Sort(field) => {
                self.controller.set_sort(field);
                String::new()
            }
            Command::Page(page) => {
                self.controller.set_page_number(page);
                String::new()
            }
            Command::Next => {
                self.controller.next_page();
                String::new()
            }
            Command::Prev => {
                self.controller.previous_page();
                String::new()
            }
            Command::Size(size) => {
                self.controller.set_page_size(size);
                String::new()
            }
            Command::Select(id) => self.toggle(id, true),
            Command::Unselect(id) => self.toggle(id, false),
            Command::SelectAll => {
                self.controller.toggle_all(true);
                format!("{} data dipilih", self.controller.selection().len())
            }
            Command::UnselectAll => {
                self.controller.toggle_all(false);
                "Pilihan dikosongkan".to_string()
            }
            Command::Delete(id) => {
                self.awaiting = Some(Confirmation::DeleteOne(id));
                "Apakah Anda yakin ingin menghapus data ini? (y/n)".to_string()
            }
            Command::DeleteSelected => match self.controller.bulk_delete_prompt() {
                Some(prompt) => {
                    self.awaiting = Some(Confirmation::DeleteSelected);
                    format!("{prompt} (y/n)")
                }
                None => "Tidak ada data yang dipilih".to_string(),
            },
            Command::Show(id) => {
                if self.controller.open_detail(id, now).await {
                    self.controller
                        .detail()
                        .map(render_detail)
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            }
            Command::Close => match self.controller.detail() {
                Some(_) => {
                    self.controller.close_detail();
                    "Detail ditutup".to_string()
                }
                None => "Tidak ada detail yang terbuka".to_string(),
            },
            Command::Edit(id, fields) => {
                if let Some(mut form) = self.controller.edit_form(id, now).await
                    && self.edit_fields(&mut form, &fields, now)
                {
                    let ticket = self.controller.save_edit(id, &form, now).await;
                    self.issue(ticket);
                }
                String::new()
            }
            Command::Add(fields) => {
                let mut form = LansiaForm::default();
                if self.edit_fields(&mut form, &fields, now) {
                    let ticket = self.controller.create_record(&form, now).await;
                    self.issue(ticket);
                }
                String::new()
            }
            Command::Upload(path) => {
                let form = UploadSpreadsheetForm::new(path);
                match upload_service::upload_spreadsheet(repo.as_ref(), &form).await {
                    Ok(report) => {
                        self.controller.post_notice(
                            NoticeKind::Success,
                            upload_service::upload_success_message(&report),
                            now,
                        );
                        self.controller.request_refresh();
                        report.errors.join("\n")
                    }
                    Err(err) => {
                        self.controller.post_notice(
                            NoticeKind::Error,
                            err.user_message("Terjadi kesalahan saat mengupload file"),
                            now,
                        );
                        String::new()
                    }
                }
            }
            Command::Template(target) => {
                match upload_service::download_template(
                    repo.as_ref(),
                    target.as_deref(),
                    &self.template_dir,
                )
                .await
                {
                    Ok(path) => format!("Template disimpan di {}", path.display()),
                    Err(err) => format!("Gagal mengunduh template: {err}"),
                }
            }
            Command::Stats => match dashboard_service::load_overview(repo.as_ref()).await {
                Ok(overview) => render_overview(&overview),
                Err(err) => format!("Gagal memuat statistik: {err}"),
            },
            Command::Need(need) => {
                match dashboard_service::urgent_need_details(repo.as_ref(), &need).await {
                    Ok(details) if details.is_empty() => "Tidak ada data".to_string(),
                    Ok(details) => details
                        .iter()
                        .map(|detail| {
                            format!(
                                "{} {} RT {} / RW {}",
                                detail.nik,
                                detail.nama_lengkap,
                                dash(detail.rt.as_deref()),
                                dash(detail.rw.as_deref())
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n"),
                    Err(err) => format!("Gagal memuat data kebutuhan: {err}"),
                }
            }
            Command::Density => self.density().await,
            Command::Dismiss => {
                self.controller.dismiss_notice();
                String::new()
            }
            Command::List => render(&self.controller.snapshot()),
            Command::Reset => {
                self.controller.clear_filters();
                String::new()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Flow::Quit,
        };
        Flow::Continue(reply)
    }

    fn toggle(&mut self, id: LansiaId, checked: bool) -> String {
        if self.controller.toggle_one(id, checked) {
            format!("{} data dipilih", self.controller.selection().len())
        } else {
            format!("Data {id} tidak ada di halaman ini")
        }
    }

    async fn density(&self) -> String {
        let repo = self.controller.repository();
        if let Some(path) = &self.rw_geojson_path {
            match dashboard_service::load_density_overlay(repo.as_ref(), path).await {
                Ok(geojson) => return render_density(&dashboard_service::overlay_counts(&geojson)),
                Err(err) => log::warn!("Falling back to the raw density map: {err}"),
            }
        }
        match repo.density_map().await {
            Ok(density) => render_density(&density),
            Err(err) => format!("Gagal memuat peta kepadatan: {err}"),
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn spawn_all<R>(
    fetches: &mut JoinSet<FetchOutcome>,
    repo: &Arc<R>,
    tickets: Vec<FetchTicket>,
) where
    R: LansiaReader + LansiaWriter + 'static,
{
    for ticket in tickets {
        fetches.spawn(ListQueryController::execute(Arc::clone(repo), ticket));
    }
}

/// Runs the interactive loop until `quit` or end of input.
pub async fn run<R>(mut session: Session<R>)
where
    R: LansiaReader + LansiaWriter + SpreadsheetTransfer + DashboardReader + AuthGateway + 'static,
{
    let repo = session.controller().repository();
    let mut fetches: JoinSet<FetchOutcome> = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_notice: Option<Notice> = None;

    session.controller_mut().load_filter_options().await;
    let initial = session.controller_mut().start();
    spawn_all(&mut fetches, &repo, initial.into_iter().collect());
    println!("{HELP}");

    loop {
        let deadline = session.controller().next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        log::error!("Failed to read input: {err}");
                        break;
                    }
                };
                match line.parse::<Command>() {
                    Ok(command) => match session.handle(command, Instant::now()).await {
                        Flow::Quit => break,
                        Flow::Continue(reply) if !reply.is_empty() => println!("{reply}"),
                        Flow::Continue(_) => {}
                    },
                    Err(CommandError::Empty) => {}
                    Err(err) => println!("{err}"),
                }
            }
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                match joined {
                    Ok(outcome) => {
                        if session.controller_mut().complete(outcome, Instant::now()) {
                            let snapshot = session.controller().snapshot();
                            last_notice = snapshot.notice.clone();
                            println!("{}", render(&snapshot));
                        }
                    }
                    Err(err) => log::error!("Fetch task failed: {err}"),
                }
            }
            _ = sleep_until_opt(deadline) => {
                session.controller_mut().poll(Instant::now());
            }
        }

        let notice = session.controller().notice().cloned();
        if notice != last_notice {
            if let Some(notice) = &notice {
                println!("{}", render_notice(notice));
            }
            last_notice = notice;
        }

        let tickets = session.take_tickets();
        spawn_all(&mut fetches, &repo, tickets);
    }

    session.controller_mut().close();
    fetches.abort_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lansia::LansiaSummary;
    use crate::repository::LansiaPage;
    use crate::repository::mock::MockRepository;

    fn id(value: i32) -> LansiaId {
        LansiaId::new(value).unwrap()
    }

    #[test]
    fn parses_table_commands() {
        assert_eq!("search siti aminah".parse(), Ok(Command::Search("siti aminah".into())));
        assert_eq!("search".parse(), Ok(Command::Search(String::new())));
        assert_eq!(
            "gender Perempuan".parse(),
            Ok(Command::Filter(FilterDimension::Gender, "Perempuan".into()))
        );
        assert_eq!(
            "age all".parse(),
            Ok(Command::Filter(FilterDimension::AgeGroup, "all".into()))
        );
        assert_eq!("sort usia".parse(), Ok(Command::Sort(SortField::Usia)));
        assert_eq!("page 3".parse(), Ok(Command::Page(3)));
        assert_eq!("size 25".parse(), Ok(Command::Size(PageSize::TwentyFive)));
        assert_eq!("select 4".parse(), Ok(Command::Select(id(4))));
        assert_eq!("y".parse(), Ok(Command::Confirm(true)));
        assert_eq!("template".parse(), Ok(Command::Template(None)));
        assert_eq!("tutup".parse(), Ok(Command::Close));
        assert_eq!("dismiss".parse(), Ok(Command::Dismiss));
    }

    #[test]
    fn rejects_invalid_commands() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "size 20".parse::<Command>(),
            Err(CommandError::InvalidArgument("20".into()))
        );
        assert_eq!(
            "page".parse::<Command>(),
            Err(CommandError::MissingArgument("halaman"))
        );
        assert!("sort alamat".parse::<Command>().is_err());
        assert_eq!(
            "terbang".parse::<Command>(),
            Err(CommandError::Unknown("terbang".into()))
        );
    }

    #[test]
    fn field_values_may_contain_spaces() {
        let command: Command = "edit 7 nama_lengkap=Siti Aminah rw=05".parse().unwrap();
        assert_eq!(
            command,
            Command::Edit(
                id(7),
                vec![
                    ("nama_lengkap".into(), "Siti Aminah".into()),
                    ("rw".into(), "05".into())
                ]
            )
        );
        assert!("add Siti".parse::<Command>().is_err());
    }

    fn mock_with_page() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_lansia().returning(|_| {
            Ok(LansiaPage {
                data: vec![LansiaSummary {
                    id: LansiaId::new(1).unwrap(),
                    nama_lengkap: "Siti Aminah".into(),
                    nik: "3273010101500001".into(),
                    jenis_kelamin: "Perempuan".into(),
                    usia: Some(74),
                    rt: Some("01".into()),
                    rw: Some("05".into()),
                    kelompok_usia: None,
                    status_perkawinan: None,
                    alamat_lengkap: None,
                    koordinat: None,
                    created_at: None,
                }],
                total: 1,
                pages: 1,
            })
        });
        repo
    }

    #[tokio::test]
    async fn render_shows_rows_selection_and_footer() {
        let mut session = Session::new(Arc::new(mock_with_page()), PathBuf::from("."), None);
        assert!(session.controller_mut().fetch_page(true).await);
        session.controller_mut().toggle_all(true);

        let text = render(&session.controller().snapshot());

        assert!(text.contains("Siti Aminah"));
        assert!(text.contains("01/05"));
        assert!(text.contains("[x]"));
        assert!(text.contains("Menampilkan 1 - 1 dari 1 data"));
        assert!(text.contains("Halaman 1 dari 1"));
        assert!(text.contains("1 data dipilih"));
    }

    #[tokio::test]
    async fn delete_waits_for_confirmation() {
        let mut repo = mock_with_page();
        repo.expect_delete_lansia()
            .withf(|deleted| deleted.get() == 1)
            .times(1)
            .returning(|_| Ok(()));
        let mut session = Session::new(Arc::new(repo), PathBuf::from("."), None);
        assert!(session.controller_mut().fetch_page(true).await);
        let now = Instant::now();

        let prompt = session.handle(Command::Delete(id(1)), now).await;
        assert_eq!(
            prompt,
            Flow::Continue("Apakah Anda yakin ingin menghapus data ini? (y/n)".into())
        );
        assert!(session.take_tickets().is_empty());

        session.handle(Command::Confirm(true), now).await;

        assert_eq!(session.take_tickets().len(), 1);
        assert_eq!(
            session.controller().notice().map(|n| n.message.as_str()),
            Some("Data berhasil dihapus")
        );
    }

    #[tokio::test]
    async fn other_commands_cancel_a_pending_confirmation() {
        let mut repo = mock_with_page();
        repo.expect_bulk_delete_lansia().times(0);
        let mut session = Session::new(Arc::new(repo), PathBuf::from("."), None);
        assert!(session.controller_mut().fetch_page(true).await);
        let now = Instant::now();

        session.handle(Command::SelectAll, now).await;
        let prompt = session.handle(Command::DeleteSelected, now).await;
        assert_eq!(
            prompt,
            Flow::Continue("Apakah Anda yakin ingin menghapus 1 data? (y/n)".into())
        );

        session.handle(Command::List, now).await;
        let reply = session.handle(Command::Confirm(true), now).await;

        assert_eq!(
            reply,
            Flow::Continue("Tidak ada yang perlu dikonfirmasi".into())
        );
    }

    #[tokio::test]
    async fn close_drops_the_open_detail() {
        let mut repo = mock_with_page();
        repo.expect_get_lansia().times(1).returning(|id| {
            let detail = serde_json::from_value(serde_json::json!({
                "id": id.get(),
                "nama_lengkap": "Siti Aminah",
                "nik": "3273010101500001",
                "jenis_kelamin": "Perempuan",
                "tanggal_lahir": "1950-01-01"
            }))
            .unwrap();
            Ok(Some(detail))
        });
        let mut session = Session::new(Arc::new(repo), PathBuf::from("."), None);
        let now = Instant::now();

        let Flow::Continue(text) = session.handle(Command::Show(id(1)), now).await else {
            panic!("show ended the session");
        };
        assert!(text.contains("Siti Aminah"));
        assert!(session.controller().detail().is_some());

        let reply = session.handle(Command::Close, now).await;

        assert_eq!(reply, Flow::Continue("Detail ditutup".into()));
        assert!(session.controller().snapshot().detail.is_none());
        assert_eq!(
            session.handle(Command::Close, now).await,
            Flow::Continue("Tidak ada detail yang terbuka".into())
        );
    }

    #[tokio::test]
    async fn dismiss_clears_the_notice() {
        let mut session = Session::new(Arc::new(MockRepository::new()), PathBuf::from("."), None);
        let now = Instant::now();
        session
            .controller_mut()
            .post_notice(NoticeKind::Error, "Gagal memuat data", now);

        session.handle(Command::Dismiss, now).await;

        assert!(session.controller().notice().is_none());
        assert!(session.controller().snapshot().notice.is_none());
    }

    #[tokio::test]
    async fn quit_ends_the_session() {
        let mut session = Session::new(Arc::new(MockRepository::new()), PathBuf::from("."), None);
        assert_eq!(session.handle(Command::Quit, Instant::now()).await, Flow::Quit);
    }

    #[test]
    fn density_is_listed_per_rw() {
        let density = DensityMap::from([("01".to_string(), 0), ("02".to_string(), 100)]);
        let text = render_density(&density);
        assert!(text.contains("RW 01: 0 lansia  hsl(30, 100%, 100%)"));
        assert!(text.contains("RW 02: 100 lansia  hsl(30, 100%, 20%)"));
    }
}
