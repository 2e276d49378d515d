pub mod limits {

    /// Movies listed per section of the index view.
    pub const INDEX_SECTION_SIZE: u64 = 5;
}

pub mod fields {

    pub const POSTER: &str = "poster";

    pub const PHOTO: &str = "photo";
}
