use rand::seq::index;
use rand::Rng;
use std::io::Write;

pub const DEFAULT_USERS: u32 = 900;
pub const DEFAULT_ITEMS: u32 = 1600;
pub const DEFAULT_MAX_RATING: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid dataset configuration: {0}")]
    Configuration(String),
    #[error("failed to write ratings")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Shape of a synthetic rating dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetConfig {
    users: u32,
    items: u32,
    max_rating: u32,
}

impl DatasetConfig {
    pub fn new(users: u32, items: u32, max_rating: u32) -> Result<Self> {
        if max_rating == 0 {
            return Err(Error::Configuration(String::from(
                "the maximum rating should be at least 1",
            )));
        }
        Ok(Self {
            users,
            items,
            max_rating,
        })
    }

    pub fn users(&self) -> u32 {
        self.users
    }

    pub fn items(&self) -> u32 {
        self.items
    }

    pub fn max_rating(&self) -> u32 {
        self.max_rating
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            items: DEFAULT_ITEMS,
            max_rating: DEFAULT_MAX_RATING,
        }
    }
}

/// One line of the dataset. Users and items are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub user: u32,
    pub item: u32,
    pub rating: u32,
}

/// Draws the profile of every user: a number of items uniform in
/// `[0, items]`, picked without replacement, each rated uniformly in
/// `[1, max_rating]`.
pub fn generate<R: Rng>(config: &DatasetConfig, rng: &mut R) -> Vec<Rating> {
    let mut ratings = Vec::new();
    for user in 1..=config.users {
        let profile_size = rng.gen_range(0..=config.items);
        let items =
            index::sample(rng, config.items as usize, profile_size as usize);
        for item in items.iter() {
            ratings.push(Rating {
                user,
                item: item as u32 + 1,
                rating: rng.gen_range(1..=config.max_rating),
            });
        }
    }
    ratings
}

/// Writes `ratings` as `user,item,rating,0` lines, without header. Returns
/// the number of lines written.
pub fn write_csv<'a, W: Write>(
    ratings: impl IntoIterator<Item = &'a Rating>,
    writer: W,
) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let mut lines = 0;
    for rating in ratings {
        writer.write_record(&[
            rating.user.to_string(),
            rating.item.to_string(),
            rating.rating.to_string(),
            String::from("0"),
        ])?;
        lines += 1;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(lines)
}
