use crate::parsers::text::{self, ArtifactEntry, ArtifactLine, ArtifactReader};

fn entry(url: &str, content: &str) -> ArtifactEntry {
    ArtifactEntry {
        url: url.to_string(),
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(
            text::classify_line("URL: https://a.example/chairs"),
            ArtifactLine::Marker("https://a.example/chairs")
        );
        assert_eq!(text::classify_line("URL:siteA.com  "), ArtifactLine::Marker("siteA.com"));
        assert_eq!(text::classify_line("  Oak Chair "), ArtifactLine::Content("Oak Chair"));
        assert_eq!(text::classify_line("   "), ArtifactLine::Blank);
        assert_eq!(text::classify_line(""), ArtifactLine::Blank);
    }

    #[test]
    fn test_format_block_is_exact() {
        let names = vec!["Oak Chair".to_string(), "Lamp".to_string()];
        assert_eq!(
            text::format_block("siteA.com", &names),
            "\nURL: siteA.com\nOak Chair\nLamp\n"
        );
    }

    #[test]
    fn test_three_document_round_trip() {
        let artifact = "\nURL: A\nn1\nn2\n\nURL: B\nn3\n";
        assert_eq!(
            text::parse_artifact(artifact),
            vec![entry("A", "n1"), entry("A", "n2"), entry("B", "n3")]
        );
    }

    #[test]
    fn test_written_blocks_parse_back() {
        let mut artifact = String::new();
        artifact.push_str(&text::format_block(
            "https://shop.example/beds",
            &["King Bed".to_string()],
        ));
        artifact.push_str(&text::format_block(
            "https://shop.example/tables",
            &["Dining Table".to_string(), "Coffee Table".to_string()],
        ));

        assert_eq!(
            text::parse_artifact(&artifact),
            vec![
                entry("https://shop.example/beds", "King Bed"),
                entry("https://shop.example/tables", "Dining Table"),
                entry("https://shop.example/tables", "Coffee Table"),
            ]
        );
    }

    #[test]
    fn test_content_before_first_marker_has_empty_url() {
        let artifact = "Orphan Stool\nURL: A\nn1\n";
        assert_eq!(
            text::parse_artifact(artifact),
            vec![entry("", "Orphan Stool"), entry("A", "n1")]
        );
    }

    #[test]
    fn test_reader_streams_lines() {
        let artifact = "\nURL: A\nn1\n";
        let mut reader = ArtifactReader::new(artifact.as_bytes());
        assert_eq!(reader.next().unwrap().unwrap(), entry("A", "n1"));
        assert!(reader.next().is_none());
    }
}
