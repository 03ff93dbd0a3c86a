// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::judgment::PageJudgment;
    use serde_json::json;

    #[test]
    fn test_from_value_complete() {
        let value = json!({
            "relevant_sections": [
                {"title": "Pricing", "content": "Plans start at $10/mo"},
                {"title": "Features", "content": "Full API access"}
            ],
            "key_points": ["Free trial available"],
            "relevance_score": 8,
            "summary": "Pricing overview",
            "new_concepts": ["enterprise tier"],
            "contradictions": []
        });

        let judgment = PageJudgment::from_value(&value);
        assert_eq!(judgment.relevance_score, 8);
        assert_eq!(judgment.sections.len(), 2);
        assert_eq!(judgment.sections[0].title, "Pricing");
        assert_eq!(judgment.key_points, vec!["Free trial available"]);
        assert_eq!(judgment.summary, "Pricing overview");
        assert_eq!(judgment.new_concepts, vec!["enterprise tier"]);
        assert!(!judgment.is_empty());
    }

    #[test]
    fn test_from_value_missing_fields_default() {
        let value = json!({ "relevance_score": 3 });
        let judgment = PageJudgment::from_value(&value);
        assert_eq!(judgment.relevance_score, 3);
        assert!(judgment.sections.is_empty());
        assert!(judgment.key_points.is_empty());
        assert!(judgment.summary.is_empty());
    }

    #[test]
    fn test_from_value_score_clamped() {
        let value = json!({ "relevance_score": 99 });
        let judgment = PageJudgment::from_value(&value);
        assert_eq!(judgment.relevance_score, 10);
    }

    #[test]
    fn test_from_value_malformed_yields_empty() {
        // Non-object values normalize to the empty zero-relevance judgment
        let judgment = PageJudgment::from_value(&json!("not an object"));
        assert_eq!(judgment.relevance_score, 0);
        assert!(judgment.is_empty());

        let judgment = PageJudgment::from_value(&json!([1, 2, 3]));
        assert!(judgment.is_empty());
    }

    #[test]
    fn test_from_value_wrong_types_default() {
        let value = json!({
            "relevance_score": "high",
            "key_points": "not an array",
            "relevant_sections": 42
        });
        let judgment = PageJudgment::from_value(&value);
        assert_eq!(judgment.relevance_score, 0);
        assert!(judgment.key_points.is_empty());
        assert!(judgment.sections.is_empty());
    }

    #[test]
    fn test_section_without_content() {
        let value = json!({
            "relevance_score": 5,
            "relevant_sections": [{"title": "Only title"}]
        });
        let judgment = PageJudgment::from_value(&value);
        assert_eq!(judgment.sections.len(), 1);
        assert_eq!(judgment.sections[0].content, "");
    }
}
