//! Replace every campground with randomly generated sample data.
//!
//! ```text
//! YELPCAMP_DATABASE_URL=postgres://localhost/yelpcamp \
//!   seed-campgrounds --author 3fa85f64-5717-4562-b3fc-2c963f66afa6 --count 50 --seed 7
//! ```
//!
//! `--database-url` overrides `YELPCAMP_DATABASE_URL`.
//!
//! Reviews listed on the old campgrounds are deleted first so none are left
//! dangling.

use clap::Parser;
use color_eyre::eyre::{Context, Result, bail, eyre};
use mockable::{DefaultEnv, Env};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use yelpcamp::domain::ports::{CampgroundRepository, ReviewRepository};
use yelpcamp::domain::{
    Campground, CampgroundDetails, ImageRef, Price, ReviewId, UserId,
};
use yelpcamp::outbound::persistence::{
    DbPool, DieselCampgroundRepository, DieselReviewRepository, PoolConfig,
    run_pending_migrations,
};

const DEFAULT_COUNT: usize = 50;

const DESCRIPTORS: &[&str] = &[
    "Forest", "Ancient", "Petrified", "Roaring", "Cascade", "Tumbling", "Silent", "Redwood",
    "Bullfrog", "Maple", "Misty", "Elk", "Grizzly", "Ocean", "Sea", "Sky", "Dusty", "Diamond",
];

const PLACES: &[&str] = &[
    "Flats", "Village", "Canyon", "Pond", "Group Camp", "Horse Camp", "Ghost Town", "Camp",
    "Dispersed Camp", "Backcountry", "River", "Creek", "Creekside", "Bay", "Spring", "Bayshore",
    "Sands", "Mule Camp", "Hunting Camp", "Cliffs", "Hollow",
];

const CITIES: &[(&str, &str)] = &[
    ("Denver", "Colorado"),
    ("Boulder", "Colorado"),
    ("Flagstaff", "Arizona"),
    ("Moab", "Utah"),
    ("Bend", "Oregon"),
    ("Missoula", "Montana"),
    ("Asheville", "North Carolina"),
    ("Burlington", "Vermont"),
    ("Duluth", "Minnesota"),
    ("Santa Fe", "New Mexico"),
    ("Jackson", "Wyoming"),
    ("Bozeman", "Montana"),
    ("Sedona", "Arizona"),
    ("Tahoe City", "California"),
    ("Bar Harbor", "Maine"),
    ("Ely", "Minnesota"),
    ("Hood River", "Oregon"),
    ("Leavenworth", "Washington"),
    ("Gatlinburg", "Tennessee"),
    ("Marquette", "Michigan"),
];

const SAMPLE_IMAGES: [(&str, &str); 2] = [
    (
        "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/forest-site.jpg",
        "YelpCamp/forest-site",
    ),
    (
        "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/lake-site.jpg",
        "YelpCamp/lake-site",
    ),
];

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet consectetur adipisicing elit. \
    Quibusdam dolores vero perferendis laudantium, consequuntur voluptatibus nulla \
    architecto, sit soluta esse iure sed labore ipsam a cum nihil atque molestiae deserunt!";

const DATABASE_URL_ENV: &str = "YELPCAMP_DATABASE_URL";

/// `seed-campgrounds` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-campgrounds",
    about = "Replace every campground with generated sample data",
    version
)]
struct SeedArgs {
    /// User id recorded as the author of every campground.
    #[arg(long, value_name = "uuid")]
    author: UserId,
    /// How many campgrounds to create.
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    count: usize,
    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// PostgreSQL connection string.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn resolve_database_url(explicit: Option<String>, env: &impl Env) -> Result<String> {
    match explicit {
        Some(url) if url.trim().is_empty() => bail!("--database-url must not be empty"),
        Some(url) => Ok(url),
        None => env
            .string(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}")),
    }
}

fn pick<'a, T>(rng: &mut SmallRng, items: &'a [T]) -> Result<&'a T> {
    items.choose(rng).ok_or_else(|| eyre!("empty sample list"))
}

/// Build `count` campgrounds authored by `author`.
fn generate(rng: &mut SmallRng, author: &UserId, count: usize) -> Result<Vec<Campground>> {
    (0..count)
        .map(|_| {
            let (city, state) = pick(rng, CITIES)?;
            let title = format!("{} {}", pick(rng, DESCRIPTORS)?, pick(rng, PLACES)?);
            let price = Price::new(f64::from(rng.gen_range(10_u32..30)))
                .map_err(|err| eyre!("generated price rejected: {err}"))?;
            let details = CampgroundDetails {
                title,
                description: DESCRIPTION.to_owned(),
                price,
                location: format!("{city}, {state}"),
            };
            let images = SAMPLE_IMAGES
                .iter()
                .map(|(url, filename)| ImageRef::new(*url, *filename))
                .collect();
            Ok(Campground::create(*author, details, None, images))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = SeedArgs::parse();
    let database_url = resolve_database_url(args.database_url, &DefaultEnv::new())?;
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    run_pending_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("connect to database")?;
    let campgrounds = DieselCampgroundRepository::new(pool.clone());
    let reviews = DieselReviewRepository::new(pool);

    let existing = campgrounds.list().await.wrap_err("list campgrounds")?;
    let listed: Vec<ReviewId> = existing
        .iter()
        .flat_map(|campground| campground.reviews().iter().copied())
        .collect();
    let removed_reviews = reviews
        .delete_many(&listed)
        .await
        .wrap_err("delete reviews")?;
    let removed = campgrounds
        .delete_all()
        .await
        .wrap_err("delete campgrounds")?;
    info!(removed, removed_reviews, "cleared existing campgrounds");

    let generated = generate(&mut rng, &args.author, args.count)?;
    for campground in &generated {
        campgrounds
            .insert(campground)
            .await
            .wrap_err("insert campground")?;
    }
    info!(inserted = generated.len(), "database has been seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(url: Option<&'static str>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |_| url.map(str::to_owned));
        env
    }

    #[rstest]
    #[case(Some("postgres://cli/yelpcamp"), Some("postgres://env/yelpcamp"), "postgres://cli/yelpcamp")]
    #[case(None, Some("postgres://env/yelpcamp"), "postgres://env/yelpcamp")]
    fn database_url_prefers_the_flag(
        #[case] flag: Option<&str>,
        #[case] env: Option<&'static str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(flag.map(str::to_owned), &env_with(env)).expect("url");
        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(Some("  "), Some("postgres://env/yelpcamp"))]
    #[case(None, None)]
    #[case(None, Some(""))]
    fn database_url_must_be_present(#[case] flag: Option<&str>, #[case] env: Option<&'static str>) {
        assert!(resolve_database_url(flag.map(str::to_owned), &env_with(env)).is_err());
    }

    #[rstest]
    fn arguments_parse_author_and_defaults() {
        let args = SeedArgs::try_parse_from([
            "seed-campgrounds",
            "--author",
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        ])
        .expect("arguments parse");
        assert_eq!(args.author, author());
        assert_eq!(args.count, DEFAULT_COUNT);
        assert!(args.seed.is_none());
        assert!(
            SeedArgs::try_parse_from(["seed-campgrounds", "--author", "nobody"]).is_err(),
            "author must be a UUID"
        );
    }

    fn author() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    #[rstest]
    fn generated_campgrounds_are_valid_and_reproducible() {
        let first = generate(&mut SmallRng::seed_from_u64(7), &author(), 20).expect("generate");
        let second = generate(&mut SmallRng::seed_from_u64(7), &author(), 20).expect("generate");

        let titles = |items: &[Campground]| -> Vec<String> {
            items.iter().map(|c| c.title().to_owned()).collect()
        };
        assert_eq!(titles(&first), titles(&second));
        for campground in &first {
            let price = campground.details().price.amount();
            assert!((10.0..30.0).contains(&price), "price {price}");
            assert_eq!(campground.author(), &author());
            assert_eq!(campground.images().len(), 2);
            assert!(campground.reviews().is_empty());
            assert!(campground.location().contains(", "));
        }
    }

    #[rstest]
    fn zero_count_generates_nothing() {
        let generated = generate(&mut SmallRng::seed_from_u64(1), &author(), 0).expect("generate");
        assert!(generated.is_empty());
    }
}
