pub mod audio_files;
pub mod ddl;
pub mod jobs;
pub mod segments;
pub mod uploads;
