use chrono::Utc;
use diesel::prelude::*;

use crate::domain::media::{Media, NewMedia};
use crate::domain::types::MediaId;
use crate::models::media::{Media as DbMedia, NewMedia as DbNewMedia};
use crate::repository::{DieselStore, MediaStore, RepositoryResult};
use crate::schema::media;

impl MediaStore for DieselStore<'_> {
    fn find_media_by_id(&mut self, id: MediaId) -> RepositoryResult<Option<Media>> {
        let conn = &mut *self.conn;

        let row = media::table
            .filter(media::id.eq(id.get()))
            .first::<DbMedia>(conn)
            .optional()?;

        Ok(row.map(Media::try_from).transpose()?)
    }

    fn insert_media(&mut self, new_media: &NewMedia) -> RepositoryResult<Media> {
        let conn = &mut *self.conn;
        let row = DbNewMedia::from_domain(new_media, Utc::now().naive_utc());

        let created = diesel::insert_into(media::table)
            .values(&row)
            .get_result::<DbMedia>(conn)?;

        Ok(Media::try_from(created)?)
    }
}
