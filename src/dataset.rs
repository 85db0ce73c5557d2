use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_reader;

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

static DATA_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

const EMBEDDED_SAMPLE: &str = "nsfg_sample.json";

pub const LIVE_BIRTH: u8 = 1;

/// one pregnancy, reduced to the columns we tabulate
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// length in weeks
    pub prglngth: u32,
    pub outcome: u8,
    #[serde(default)]
    pub birthord: Option<u8>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Dataset {
    pub name: String,
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Box<dyn Error>> {
        let dataset = from_reader(reader)?;

        Ok(dataset)
    }

    /// small synthetic sample bundled with the binary
    pub fn embedded() -> Result<Self, Box<dyn Error>> {
        let file = DATA_DIR
            .get_file(EMBEDDED_SAMPLE)
            .ok_or("embedded sample is missing")?;

        Self::from_reader(file.contents())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn live(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(|r| r.outcome == LIVE_BIRTH)
    }

    pub fn firsts(&self) -> impl Iterator<Item = &Record> + '_ {
        self.live().filter(|r| r.birthord == Some(1))
    }

    pub fn others(&self) -> impl Iterator<Item = &Record> + '_ {
        self.live().filter(|r| r.birthord != Some(1))
    }
}

pub fn lengths<'a, I>(records: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(|r| r.prglngth).collect()
}
