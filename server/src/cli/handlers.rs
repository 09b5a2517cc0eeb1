// server/src/cli/handlers.rs

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tokio::time::sleep;

use lib::admission::{AdmissionDesk, IncomingQueue};
use lib::config::SuveraConfig;
use lib::connectors::{HttpBackendClient, HttpTriageClient, OsrmRoutingClient, StaticGeolocator};
use lib::discovery::{DiscoverySession, RouteOutcome};
use lib::orchestrator::{EmergencyFlow, FlowOutcome};
use lib::session::{Identity, Session};
use lib::triage::{AudioRecorder, FileAudioSource, TriageClassifier};
use lib::TriageError;
use models::{
    AdmissionDecision, AdmissionStatus, Coordinate, Department, HospitalCandidate, HospitalId,
    LanguageTag, PatientInfo, RequestId, SosKind, SymptomInput, TriageVerdict,
};

use crate::cli::commands::{
    AnalyzerAction, DiscoverArgs, HospitalAction, LocationArgs, RequestArgs, SosArgs, SosKindArg,
    TriageArgs,
};

/// HTTP clients for the three external systems, built once per command.
struct Services {
    backend: Arc<HttpBackendClient>,
    router: Arc<OsrmRoutingClient>,
}

impl Services {
    fn new(config: &SuveraConfig) -> Result<Self> {
        Ok(Self {
            backend: Arc::new(HttpBackendClient::new(&config.backend)?),
            router: Arc::new(OsrmRoutingClient::new(&config.routing)?),
        })
    }

    fn discovery(&self) -> DiscoverySession {
        DiscoverySession::new(self.backend.clone(), self.router.clone())
    }
}

fn geolocator(location: &LocationArgs, config: &SuveraConfig) -> Result<StaticGeolocator> {
    match (location.lat, location.lng) {
        (Some(lat), Some(lng)) => Ok(StaticGeolocator::new(Some(Coordinate::new(lat, lng)?))),
        _ => Ok(StaticGeolocator::from_config(&config.location)?),
    }
}

fn emergency_flow(config: &SuveraConfig) -> Result<EmergencyFlow> {
    let client = HttpTriageClient::new(&config.triage_service)?;
    Ok(EmergencyFlow::new(TriageClassifier::new(Arc::new(client), config.audio.max_capture())))
}

fn print_verdict(verdict: &TriageVerdict, visible_text: Option<&str>) {
    if let Some(text) = visible_text {
        println!("{:<15} {}", "Symptoms", text);
    }
    println!("{:<15} {}", "Condition", verdict.condition());
    println!("{:<15} {}", "Department", verdict.department());
    if let Some(doctor) = verdict.recommended_doctor() {
        println!("{:<15} {}", "Doctor", doctor);
    }
    if verdict.criticality().is_critical() {
        println!("{}", "CRITICAL: routing to the nearest hospitals, no login needed.".red().bold());
    } else {
        println!("{:<15} {}", "Status", verdict.criticality().to_string().green());
    }
}

fn print_candidates(candidates: &[HospitalCandidate], selected: Option<&HospitalId>) {
    println!("\n--- Hospitals ---");
    println!("{:<3} {:<10} {:<30} {:<16} {:<40}", "", "ID", "Name", "Phone", "Address");
    println!("{:-<3} {:-<10} {:-<30} {:-<16} {:-<40}", "", "", "", "", "");
    for candidate in candidates {
        let marker = if Some(&candidate.id) == selected { "*" } else { "" };
        println!(
            "{:<3} {:<10} {:<30} {:<16} {:<40}",
            marker,
            candidate.id,
            candidate.name,
            candidate.phone.as_deref().unwrap_or("-"),
            candidate.address
        );
    }
}

/// Runs discovery for `department` and prints the results with the route to
/// the selected hospital.
async fn discover_and_print(
    services: &Services,
    geolocator: &StaticGeolocator,
    department: &Department,
    select: Option<&HospitalId>,
) -> Result<DiscoverySession> {
    let discovery = services.discovery();
    discovery.start(geolocator, department).await?;

    if let Some(id) = select {
        if let Some(RouteOutcome::Rendered(route)) = discovery.choose(id).await? {
            debug!("Route geometry has {} points", route.geometry.len());
        }
    }

    let snapshot = discovery.snapshot().await;
    print_candidates(&snapshot.candidates, snapshot.selected.as_ref());
    match (&snapshot.route, &snapshot.route_error) {
        (Some(route), _) => println!("\n{:<15} {}", "Route", route.summary().cyan()),
        (None, Some(err)) => println!("\n{:<15} {}", "Route", err.yellow()),
        (None, None) => {}
    }
    Ok(discovery)
}

async fn prompt(label: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}: ", label).as_bytes()).await?;
    stdout.flush().await?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

pub async fn handle_triage(args: TriageArgs, config: &SuveraConfig) -> Result<()> {
    let mut session = match (&args.login_as, &args.contact) {
        (Some(name), Some(contact)) => Session::patient(PatientInfo::new(name, contact)?),
        _ => Session::anonymous(),
    };

    let mut input = match (&args.text, &args.audio) {
        (Some(text), _) => SymptomInput::text(text)?,
        (None, Some(path)) => SymptomInput::audio(record_file(path, config).await?),
        (None, None) => anyhow::bail!("either --text or --audio is required"),
    };
    if let Some(language) = args.language {
        input = input.with_language(LanguageTag(language));
    }

    let mut flow = emergency_flow(config)?;
    let outcome = flow.triage(&input, &session).await?;
    print_verdict(outcome.verdict(), outcome.visible_text());

    let verdict = match outcome {
        FlowOutcome::Discover { verdict, .. } => verdict,
        FlowOutcome::AwaitingAuth { .. } => {
            println!("{}", "Not critical. Please log in to see hospitals.".yellow());
            let name = prompt("Name").await?;
            let contact = prompt("Contact number").await?;
            session.log_in(Identity::Patient(PatientInfo::new(name, contact)?));
            flow.resume_after_login(&session)
                .ok_or_else(|| TriageError::Internal("held verdict was lost".to_string()))?
        }
    };

    let services = Services::new(config)?;
    discover_and_print(&services, &geolocator(&args.location, config)?, verdict.department(), None).await?;
    Ok(())
}

async fn record_file(path: &Path, config: &SuveraConfig) -> Result<models::AudioClip> {
    let recorder = AudioRecorder::new(Arc::new(FileAudioSource::new(path)), config.audio.max_capture());
    println!("Recording from {} (max {:?})...", path.display(), recorder.max_duration());
    Ok(recorder.record(None).await?)
}

pub async fn handle_sos(args: SosArgs, config: &SuveraConfig) -> Result<()> {
    let kind = match args.kind {
        SosKindArg::Trauma => SosKind::Trauma,
        SosKindArg::General => SosKind::NearestGeneral,
    };
    let mut flow = emergency_flow(config)?;
    let outcome = flow.sos(kind, &Session::anonymous());
    print_verdict(outcome.verdict(), None);

    let services = Services::new(config)?;
    discover_and_print(&services, &geolocator(&args.location, config)?, outcome.verdict().department(), None).await?;
    Ok(())
}

pub async fn handle_discover(args: DiscoverArgs, config: &SuveraConfig) -> Result<()> {
    let department = Department::new(&args.department)?;
    let select = args.select.map(HospitalId::new).transpose()?;
    let services = Services::new(config)?;
    discover_and_print(&services, &geolocator(&args.location, config)?, &department, select.as_ref()).await?;
    Ok(())
}

pub async fn handle_request(args: RequestArgs, config: &SuveraConfig) -> Result<()> {
    let department = Department::new(&args.department)?;
    let hospital_id = HospitalId::new(&args.hospital_id)?;
    let session = match (&args.name, &args.contact) {
        (Some(name), Some(contact)) => Session::patient(PatientInfo::new(name, contact)?),
        _ => Session::anonymous(),
    };
    let patient = session.patient_info_or_anonymous(&config.admission)?;

    let services = Services::new(config)?;
    let discovery =
        discover_and_print(&services, &geolocator(&args.location, config)?, &department, Some(&hospital_id)).await?;
    let candidate = discovery
        .snapshot()
        .await
        .candidates
        .into_iter()
        .find(|c| c.id == hospital_id)
        .ok_or_else(|| TriageError::InvalidInput(format!("hospital {} is not in the results", hospital_id)))?;

    let desk = AdmissionDesk::new(services.backend.clone(), config.admission.poll_interval())?;
    let handle = desk.submit(&candidate, patient, args.symptoms).await?;
    println!("\nRequest {} sent to {}. Waiting for the hospital...", handle.request_id, candidate.name);

    let mut watch = desk.watch(handle);
    let finished = tokio::select! {
        status = watch.wait_terminal() => Some(status?),
        _ = tokio::signal::ctrl_c() => None,
    };
    match finished {
        Some(AdmissionStatus::Accepted) => {
            println!("{}", format!("{} accepted your request.", candidate.name).green().bold())
        }
        Some(AdmissionStatus::Declined) => println!(
            "{}",
            format!("{} declined your request. Choose another hospital.", candidate.name).red().bold()
        ),
        Some(AdmissionStatus::Pending) | None => {
            watch.cancel();
            println!("\nStopped waiting. The request stays with the hospital.");
        }
    }
    Ok(())
}

fn print_queue(rows: &[models::AdmissionRequest]) {
    println!("\n--- Incoming Requests ---");
    println!("{:<10} {:<20} {:<14} {:<30} {:<20}", "ID", "Patient", "Contact", "Symptoms", "Requested");
    println!("{:-<10} {:-<20} {:-<14} {:-<30} {:-<20}", "", "", "", "", "");
    if rows.is_empty() {
        println!("{:<10} {}", "-", "No pending requests.");
    }
    for row in rows {
        let requested = row
            .requested_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<20} {:<14} {:<30} {:<20}",
            row.id, row.patient_name, row.contact_number, row.symptom_summary, requested
        );
    }
}

pub async fn handle_hospital(action: HospitalAction, config: &SuveraConfig) -> Result<()> {
    let services = Services::new(config)?;
    let hospital_session = |id: &str| -> Result<Session> { Ok(Session::hospital(HospitalId::new(id)?, id)) };

    match action {
        HospitalAction::Queue { hospital_id, watch } => {
            let queue = IncomingQueue::for_session(services.backend.clone(), &hospital_session(hospital_id.as_str())?)?;
            print_queue(&queue.refresh().await?);
            if !watch {
                return Ok(());
            }

            let period = config.admission.poll_interval();
            let _watcher = queue.spawn_watcher(period);
            let mut shown = queue.rows().await;
            loop {
                tokio::select! {
                    _ = sleep(period) => {
                        let rows = queue.rows().await;
                        if rows != shown {
                            print_queue(&rows);
                            shown = rows;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Stopped watching queue for hospital {}", hospital_id);
                        break;
                    }
                }
            }
            Ok(())
        }
        HospitalAction::Accept { hospital_id, request_id } => {
            decide(&services, hospital_session(hospital_id.as_str())?, &request_id, AdmissionDecision::Accept).await
        }
        HospitalAction::Decline { hospital_id, request_id } => {
            decide(&services, hospital_session(hospital_id.as_str())?, &request_id, AdmissionDecision::Decline).await
        }
    }
}

async fn decide(services: &Services, session: Session, request_id: &str, decision: AdmissionDecision) -> Result<()> {
    let queue = IncomingQueue::for_session(services.backend.clone(), &session)?;
    queue.refresh().await?;
    let status = queue.decide(&RequestId::new(request_id)?, decision).await?;
    println!("Request {} {}.", request_id, status.to_string().to_lowercase());
    print_queue(&queue.rows().await);
    Ok(())
}

pub async fn handle_analyzer(action: AnalyzerAction, config: &SuveraConfig) -> Result<()> {
    match action {
        AnalyzerAction::Start { host, port } => {
            let mut analyzer = config.analyzer.clone();
            if let Some(host) = host {
                analyzer.host = host;
            }
            if let Some(port) = port {
                analyzer.port = port;
            }

            let (shutdown_tx, shutdown_rx) = oneshot::channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(());
                }
            });
            rest_api::start_server(&analyzer, shutdown_rx)
                .await
                .context("Symptom analyzer stopped with an error")
        }
    }
}
