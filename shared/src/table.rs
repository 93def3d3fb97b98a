use std::{collections::BTreeMap, fs, io::Read, path::Path};

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::debug;

use crate::{LoadError, Metric, Record, FIELD_COUNT};

const COLUMNS: [&str; FIELD_COUNT] = ["name", "threads", "time_ms", "prec", "mse"];

/// Points of one name for a single metric, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(u32, f64)>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All rows of a results file plus their grouping by `name`.
///
/// The grouping is built once, in a single pass, and keeps the row indices
/// of every name in file order. Names iterate sorted.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
    groups: BTreeMap<String, Vec<usize>>,
}

impl Table {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            groups.entry(record.name.clone()).or_default().push(index);
        }
        Self { records, groups }
    }

    /// Read a headerless `name,threads,time_ms,prec,mse` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| LoadError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(data.as_slice())?;
        debug!(
            path = %path.display(),
            rows = table.len(),
            names = table.groups.len(),
            "loaded results"
        );
        Ok(table)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in reader.byte_records() {
            let row = row?;
            if is_blank(&row) {
                continue;
            }
            records.push(parse_row(&row)?);
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Rows of `name` in file order
    pub fn rows<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.groups
            .get(name)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    /// One series per name, sorted by name. Points are neither sorted nor
    /// deduplicated.
    pub fn series(&self, metric: Metric) -> Vec<Series> {
        self.groups
            .iter()
            .map(|(name, indices)| Series {
                name: name.clone(),
                points: indices
                    .iter()
                    .map(|&index| {
                        let record = &self.records[index];
                        (record.threads, metric.value(record))
                    })
                    .collect(),
            })
            .collect()
    }
}

fn is_blank(row: &ByteRecord) -> bool {
    row.iter().all(<[u8]>::is_empty)
}

fn parse_row(row: &ByteRecord) -> Result<Record, LoadError> {
    let malformed = |reason: String| LoadError::Parse {
        line: row.position().map_or(0, |p| p.line()),
        content: row
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(","),
        reason,
    };

    if row.len() != FIELD_COUNT {
        return Err(malformed(format!(
            "expected {FIELD_COUNT} fields, found {}",
            row.len()
        )));
    }

    row.deserialize(None).map_err(|e| malformed(describe(&e)))
}

fn describe(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => {
                let column = COLUMNS.get(field as usize).copied().unwrap_or("?");
                format!("column `{column}`: {}", err.kind())
            }
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::Table;
    use crate::{LoadError, Metric, Record};

    const SAMPLE: &str = "a,1,100,0.9,0.01\na,2,150,0.85,0.02\nb,1,90,0.95,0.005\n";

    #[test]
    fn sample() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.names().collect::<Vec<_>>(), ["a", "b"]);

        let series = table.series(Metric::TimeMs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "a");
        assert_eq!(series[0].points, [(1, 100.0), (2, 150.0)]);
        assert_eq!(series[1].name, "b");
        assert_eq!(series[1].points, [(1, 90.0)]);
    }

    #[test]
    fn records_keep_column_order() {
        let table = Table::from_reader("method_a,4,123.5,0.91,0.002".as_bytes()).unwrap();
        assert_eq!(
            table.records(),
            [Record::new("method_a", 4, 123.5, 0.91, 0.002)]
        );
    }

    #[test]
    fn triples_reproduce_input() {
        let input = "b,8,10,0.5,0.1\na,4,20,0.6,0.2\nb,2,30,0.7,0.3\na,4,20,0.6,0.2\nb,1,40,0.8,0.4\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();

        for metric in Metric::ALL {
            let mut rebuilt = Vec::new();
            for series in table.series(metric) {
                for (threads, value) in series.points {
                    rebuilt.push((series.name.clone(), threads, value));
                }
            }

            let mut expected: Vec<_> = table
                .records()
                .iter()
                .map(|r| (r.name.clone(), r.threads, metric.value(r)))
                .collect();
            // series come grouped by name; within a name the file order must hold
            expected.sort_by(|x, y| x.0.cmp(&y.0));
            assert_eq!(rebuilt, expected);
        }
    }

    #[test]
    fn unsorted_and_duplicate_threads_are_kept() {
        let input = "a,8,1,0,0\na,2,2,0,0\na,8,3,0,0\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();
        let series = table.series(Metric::TimeMs);
        assert_eq!(series[0].points, [(8, 1.0), (2, 2.0), (8, 3.0)]);
    }

    #[test]
    fn rows_by_name() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();
        let threads: Vec<_> = table.rows("a").map(|r| r.threads).collect();
        assert_eq!(threads, [1, 2]);
        assert_eq!(table.rows("missing").count(), 0);
    }

    #[test]
    fn whitespace_and_blank_lines() {
        let input = "\n a , 1 , 100 , 0.9 , 0.01 \n\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.records(), [Record::new("a", 1, 100.0, 0.9, 0.01)]);
    }

    #[test]
    fn missing_field() {
        let err = Table::from_reader("a,1,100,0.9".as_bytes()).unwrap_err();
        match err {
            LoadError::Parse { line, content, .. } => {
                assert_eq!(line, 1);
                assert_eq!(content, "a,1,100,0.9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_field() {
        let err = Table::from_reader(format!("{SAMPLE}c,1,1,1,1,1\n").as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 4, .. }));
    }

    #[test]
    fn non_numeric_value() {
        let err = Table::from_reader("a,1,100,0.9,0.01\na,2,fast,0.8,0.02\n".as_bytes())
            .unwrap_err();
        match err {
            LoadError::Parse { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("time_ms"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8() {
        let input: &[u8] = b"a,1,100,0.9,0.01\na\xff,1,100,0.9,0.01\n";
        let err = Table::from_reader(input).unwrap_err();
        match err {
            LoadError::Parse {
                line,
                content,
                reason,
            } => {
                assert_eq!(line, 2);
                assert_eq!(content, "a\u{fffd},1,100,0.9,0.01");
                assert!(reason.contains("name"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_row_is_rejected() {
        let input = format!("name,threads,time_ms,prec,mse\n{SAMPLE}");
        let err = Table::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            Table::from_reader("".as_bytes()),
            Err(LoadError::Empty)
        ));
        assert!(matches!(
            Table::from_reader("\n\n".as_bytes()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Table::load(dir.path().join("w8a.txt")).unwrap_err();
        assert!(matches!(err, LoadError::File { .. }));
    }

    #[test]
    fn from_records_allows_empty() {
        let table = Table::from_records(Vec::new());
        assert!(table.is_empty());
        assert!(table.series(Metric::Mse).is_empty());
    }
}
