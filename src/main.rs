// Headless driver: runs the widget pipeline against the live discovery endpoint

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use hotel_finder::{
    Coordinates, DiscoveryConfig, DiscoverySearchClient, Field, MarkerDragEvent,
    RecordingModalService, ScrollContainer, StaticLocation, SubmissionState, ViewOrchestrator,
    WidgetConfig,
};

#[derive(Parser, Debug)]
#[command(name = "hotel-finder", about = "List hotels near a location")]
struct Args {
    /// Latitude of the user; without it the default center is used
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Drop the user pin here afterwards, as "lat,lng"
    #[arg(long, allow_hyphen_values = true)]
    drag_to: Option<String>,

    /// Open the booking form for the hotel at this index
    #[arg(long)]
    book: Option<usize>,

    #[arg(long, requires = "book")]
    first_name: Option<String>,

    #[arg(long, requires = "book")]
    last_name: Option<String>,

    #[arg(long, requires = "book")]
    email: Option<String>,

    /// Stay dates as YYYY-MM-DD
    #[arg(long, requires = "book")]
    from: Option<String>,

    #[arg(long, requires = "book")]
    to: Option<String>,

    /// Print markers as JSON
    #[arg(long)]
    json: bool,
}

// Stand-in for the hotel list element
struct HeadlessList {
    scroll: f64,
}

impl ScrollContainer for HeadlessList {
    fn scroll_left(&self) -> f64 {
        self.scroll
    }
    fn set_scroll_left(&mut self, value: f64) {
        self.scroll = value;
    }
    fn offset_left(&self) -> f64 {
        0.0
    }
    fn max_scroll_left(&self) -> f64 {
        0.0
    }
}

fn parse_pair(value: &str) -> Result<MarkerDragEvent> {
    let Some((lat, lng)) = value.split_once(',') else {
        bail!("expected \"lat,lng\", got {value}");
    };
    let lat: f64 = lat.trim().parse().context("latitude")?;
    let lng: f64 = lng.trim().parse().context("longitude")?;
    Ok(MarkerDragEvent::new(lat, lng))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let discovery = DiscoveryConfig::from_env()?;
    let search = DiscoverySearchClient::new(discovery.clone())?;
    let location = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => StaticLocation::Fix(Coordinates::new(lat, lng)?),
        _ => StaticLocation::Unavailable,
    };

    let view = ViewOrchestrator::new(
        WidgetConfig::new(discovery),
        location,
        search,
        RecordingModalService::new(),
    );

    let init = view.initialize(HeadlessList { scroll: 0.0 }).await;
    if let Err(e) = &init.search {
        info!("Initial search failed: {}", e);
    }

    if let Some(target) = args.drag_to.as_deref() {
        let event = parse_pair(target)?;
        if let Err(e) = view.marker_drag_end(&event).await? {
            info!("Search after drag failed: {}", e);
        }
    }

    let hotels = view.hotels();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&hotels)?);
    } else {
        let user = view.user_marker();
        println!("Hotels near {},{}:", user.lat, user.lng);
        for (index, marker) in hotels.iter().enumerate() {
            println!(
                "  [{}] {} ({:.5}, {:.5})",
                index,
                marker.title().unwrap_or("?"),
                marker.lat,
                marker.lng
            );
        }
    }

    if let Some(index) = args.book {
        view.open_booking_at(index)?;
        println!("Booking form opened for {}", view.form().value(Field::Hotel));

        let entries = [
            (Field::FirstName, &args.first_name),
            (Field::LastName, &args.last_name),
            (Field::Email, &args.email),
            (Field::StayFrom, &args.from),
            (Field::StayTo, &args.to),
        ];
        for (field, value) in entries {
            view.input(field, value.as_deref().unwrap_or_default())?;
            view.blur(field);
        }

        match view.submit_booking() {
            SubmissionState::Valid => {
                let details = view.form().details().context("valid form without details")?;
                println!("Booking accepted:");
                println!("{}", serde_json::to_string_pretty(&details)?);
            }
            _ => {
                let form = view.form();
                for field in Field::ALL.iter().filter(|field| form.show_error(**field)) {
                    if let Some(error) = form.field_error(*field) {
                        println!("  {}: {}", field, error);
                    }
                }
            }
        }
    }

    Ok(())
}
