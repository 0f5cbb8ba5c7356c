use crate::mapmaker::*;

/// Reads a comma-separated results table.
///
/// Invalid UTF-8 is replaced rather than rejected: the dash variants of the
/// names are normalized afterwards anyway.
pub fn read_results_text(path: &str, builder: &mut ResultStoreBuilder) -> BMapResult<usize> {
    let bytes = fs::read(path).context(OpeningResultsSnafu { path })?;
    let content = String::from_utf8_lossy(&bytes);
    let added = builder.add_lines(content.lines());
    debug!("read_results_text: {}: {} rows", path, added);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_text_file() {
        let dir = std::env::temp_dir().join(format!("ridingmap-text-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("results.txt");
        let zeros = ",0".repeat(14);
        let content = format!(
            "Don Valley North,30%,40%,20%,5%,0%,5%,0%{zeros}\r\n\
             \n\
             Etobicoke Centre,50,30,10,5,0,5,0{zeros}\n\
             Etobicoke Centre,51,29,10,5,0,5,0{zeros}\n\
             Header,LPC,CPC\n",
            zeros = zeros
        );
        fs::write(&path, content).unwrap();

        let mut builder = ResultStoreBuilder::new(&ProjectionConfig::default());
        let added = read_results_text(&path.display().to_string(), &mut builder).unwrap();
        assert_eq!(added, 3);
        assert_eq!(builder.skipped(), 2);
        let store = builder.build();
        assert_eq!(store.len(), 2);
        let slice = store
            .year_slice(&RidingName::new("Etobicoke Centre"), 0)
            .unwrap();
        assert!((slice[0] - 0.51).abs() < 1e-9);
    }

    #[test]
    fn missing_file() {
        let mut builder = ResultStoreBuilder::new(&ProjectionConfig::default());
        let err = read_results_text("/nonexistent/results.txt", &mut builder).unwrap_err();
        assert!(matches!(*err, MapError::OpeningResults { .. }));
    }
}
