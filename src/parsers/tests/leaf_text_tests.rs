use crate::parsers::html::{self, leaf_texts_from_script};
use serde_json::json;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_text_in_document_order() {
        let page = r#"<html><head><title>Shop</title></head><body>
            <header><h1>Welcome to our store</h1></header>
            <ul>
                <li><a href="/chairs/oak">Oak Chair</a></li>
                <li><span>Lamp</span> <em>new</em></li>
            </ul>
            <footer>Contact us</footer>
        </body></html>"#;

        let texts = html::parse_leaf_texts(page);
        assert_eq!(
            texts,
            vec!["Welcome to our store", "Oak Chair", "Lamp", "new", "Contact us"]
        );
    }

    #[test]
    fn test_head_text_is_ignored() {
        let page = "<html><head><title>Title only</title></head><body><p>Body text</p></body></html>";
        assert_eq!(html::parse_leaf_texts(page), vec!["Body text"]);
    }

    #[test]
    fn test_no_empty_or_whitespace_fragments() {
        let page = "<body>\n   <div>  </div>\n<p>\n\t Teak Bench \n</p><br><img src=\"x.png\"></body>";
        let texts = html::parse_leaf_texts(page);
        assert_eq!(texts, vec!["Teak Bench"]);
        assert!(texts.iter().all(|t| !t.trim().is_empty() && t.trim() == t));
    }

    #[test]
    fn test_mixed_content_yields_each_text_node() {
        // Text on both sides of an inline element are separate leaves
        let page = "<body><p>Shop the <b>Velvet Sofa</b> today</p></body>";
        assert_eq!(
            html::parse_leaf_texts(page),
            vec!["Shop the", "Velvet Sofa", "today"]
        );
    }

    #[test]
    fn test_comments_do_not_contribute() {
        let page = "<body><!-- hidden note --><p>Side Table</p></body>";
        assert_eq!(html::parse_leaf_texts(page), vec!["Side Table"]);
    }

    #[test]
    fn test_template_contents_are_skipped() {
        let page = "<html><body><template><span>Hidden Sofa</span></template><p>Lamp</p></body></html>";
        assert_eq!(html::parse_leaf_texts(page), vec!["Lamp"]);

        let nested = "<body><div><template><ul><li>Draft Bench</li></ul></template>Stool</div></body>";
        assert_eq!(html::parse_leaf_texts(nested), vec!["Stool"]);
    }

    #[test]
    fn test_empty_page() {
        assert!(html::parse_leaf_texts("").is_empty());
        assert!(html::parse_leaf_texts("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_script_result_is_cleaned() {
        let value = json!(["Oak Chair", "  ", " Lamp "]);
        assert_eq!(leaf_texts_from_script(value).unwrap(), vec!["Oak Chair", "Lamp"]);
    }

    #[test]
    fn test_script_result_must_be_string_array() {
        assert!(leaf_texts_from_script(json!(null)).is_err());
        assert!(leaf_texts_from_script(json!({"text": "Oak Chair"})).is_err());
        assert!(leaf_texts_from_script(json!(["Oak Chair", 3])).is_err());
        assert!(leaf_texts_from_script(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_script_is_recursive_leaf_walk() {
        assert!(html::LEAF_TEXT_SCRIPT.contains("document.body"));
        assert!(html::LEAF_TEXT_SCRIPT.contains("Node.TEXT_NODE"));
    }
}
