//! Favorite mark repository implementation

use crate::error::Result;
use crate::models::FavoriteMark;
use rusqlite::{params, Connection};

/// Trait for favorite mark storage operations
pub trait FavoriteRepository {
    /// Insert or replace the mark for its city
    fn set_favorite(&self, mark: &FavoriteMark) -> Result<()>;
}

/// `SQLite` implementation of `FavoriteRepository`
pub struct SqliteFavoriteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteFavoriteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl FavoriteRepository for SqliteFavoriteRepository<'_> {
    fn set_favorite(&self, mark: &FavoriteMark) -> Result<()> {
        self.conn.execute(
            "INSERT INTO favorite_cities (city_id, is_favorite) VALUES (?, ?)
             ON CONFLICT(city_id) DO UPDATE SET is_favorite = excluded.is_favorite",
            params![mark.city_id.get(), i32::from(mark.is_favorite)],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CityRepository, Database, SqliteCityRepository};
    use crate::models::{City, CityId, GeoCoordinates};

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        SqliteCityRepository::new(db.connection())
            .upsert_all(&[
                City::new(CityId::new(1), "Berlin", "DE", GeoCoordinates::new(0.0, 0.0)),
                City::new(CityId::new(2), "Boston", "US", GeoCoordinates::new(0.0, 0.0)),
            ])
            .unwrap();
        db
    }

    fn stored_marks(db: &Database) -> Vec<(i64, bool)> {
        let mut stmt = db
            .connection()
            .prepare("SELECT city_id, is_favorite FROM favorite_cities ORDER BY city_id")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get::<_, i32>(1)? != 0)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_absent_mark_means_not_favorite() {
        let db = setup();

        assert!(stored_marks(&db).is_empty());
        let city = SqliteCityRepository::new(db.connection())
            .get(CityId::new(1))
            .unwrap()
            .unwrap();
        assert!(!city.is_favorite);
    }

    #[test]
    fn test_set_favorite_replaces_mark() {
        let db = setup();
        let repo = SqliteFavoriteRepository::new(db.connection());

        repo.set_favorite(&FavoriteMark::new(CityId::new(2), true))
            .unwrap();
        repo.set_favorite(&FavoriteMark::new(CityId::new(2), false))
            .unwrap();
        repo.set_favorite(&FavoriteMark::new(CityId::new(1), true))
            .unwrap();

        assert_eq!(stored_marks(&db), vec![(1, true), (2, false)]);
    }

    #[test]
    fn test_unknown_city_is_rejected() {
        let db = setup();
        let repo = SqliteFavoriteRepository::new(db.connection());

        assert!(repo
            .set_favorite(&FavoriteMark::new(CityId::new(99), true))
            .is_err());
        assert!(stored_marks(&db).is_empty());
    }
}
