//! City catalog repository implementation

use crate::error::Result;
use crate::models::{City, CityId, GeoCoordinates};
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_CITY: &str = "SELECT c.id, c.name, c.country, c.latitude, c.longitude,
            c.coordinates_string, COALESCE(f.is_favorite, 0)
     FROM cities c
     LEFT JOIN favorite_cities f ON f.city_id = c.id";

/// Trait for city catalog storage operations
pub trait CityRepository {
    /// Whether the catalog holds at least one city
    fn has_cities(&self) -> Result<bool>;

    /// Insert or update cities keyed by ID in one transaction
    ///
    /// Favorite marks are stored separately and are never touched.
    fn upsert_all(&self, cities: &[City]) -> Result<usize>;

    /// All cities with their favorite flag, sorted by name then ID
    fn list_all(&self) -> Result<Vec<City>>;

    /// Get a city by ID
    fn get(&self, id: CityId) -> Result<Option<City>>;
}

/// `SQLite` implementation of `CityRepository`
pub struct SqliteCityRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCityRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_city(row: &rusqlite::Row<'_>) -> rusqlite::Result<City> {
        Ok(City {
            id: CityId::new(row.get(0)?),
            name: row.get(1)?,
            country: row.get(2)?,
            coordinates: GeoCoordinates::new(row.get(3)?, row.get(4)?),
            coordinates_string: row.get(5)?,
            is_favorite: row.get::<_, i32>(6)? != 0,
        })
    }
}

impl CityRepository for SqliteCityRepository<'_> {
    fn has_cities(&self) -> Result<bool> {
        let exists = self
            .conn
            .query_row("SELECT EXISTS(SELECT 1 FROM cities LIMIT 1)", [], |row| {
                row.get(0)
            })?;
        Ok(exists)
    }

    fn upsert_all(&self, cities: &[City]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO cities (id, name, country, latitude, longitude, coordinates_string)
                 VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     country = excluded.country,
                     latitude = excluded.latitude,
                     longitude = excluded.longitude,
                     coordinates_string = excluded.coordinates_string",
            )?;
            for city in cities {
                stmt.execute(params![
                    city.id.get(),
                    city.name,
                    city.country,
                    city.coordinates.latitude,
                    city.coordinates.longitude,
                    city.coordinates_string,
                ])?;
            }
        }
        tx.commit()?;
        Ok(cities.len())
    }

    fn list_all(&self) -> Result<Vec<City>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_CITY} ORDER BY c.name ASC, c.id ASC"))?;

        let cities = stmt
            .query_map([], Self::parse_city)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cities)
    }

    fn get(&self, id: CityId) -> Result<Option<City>> {
        let city = self
            .conn
            .query_row(
                &format!("{SELECT_CITY} WHERE c.id = ?"),
                params![id.get()],
                Self::parse_city,
            )
            .optional()?;
        Ok(city)
    }
}
