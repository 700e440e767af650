//! 边界修正 - 篇章末题关联的二次校正
//!
//! 分段阶段给题目挂篇章时只知道"当前活跃篇章"，
//! 篇章最后一题后面紧跟的排序题会被误挂。这里在全部
//! 题目解析完成后按题号区间重算一遍关联：区间起点取
//! 分段时记录的起始题号，终点取下一篇章起点减一（最后
//! 一个篇章取有选项题目的最大题号）。
//!
//! 前提：篇章按题号严格递增且互不重叠出现，这里沿用
//! 该假设，不做推广。

use crate::models::{Passage, Question};

/// 对完整题目列表执行关联修正
///
/// 只有带选项的题目参与；区间内打了标签的题目关联到
/// 所属篇章，没有标签的（排序题）显式清除关联。
pub(crate) fn fix_passage_links(passages: &[Passage], questions: &mut [Question]) {
    // (篇章 ID, 起始题号)
    let ranges: Vec<(&str, u32)> = passages
        .iter()
        .filter_map(|p| p.q_start.map(|start| (p.passage_id.as_str(), start)))
        .collect();

    for (idx, &(passage_id, q_start)) in ranges.iter().enumerate() {
        let actual_end = if idx + 1 < ranges.len() {
            ranges[idx + 1].1.saturating_sub(1)
        } else {
            // 最后一个篇章覆盖到有选项题目的最大题号
            match questions
                .iter()
                .filter(|q| !q.options.is_empty())
                .map(|q| q.question_number)
                .max()
            {
                Some(max_number) => max_number,
                None => continue,
            }
        };

        for question in questions.iter_mut() {
            if question.question_number < q_start || question.question_number > actual_end {
                continue;
            }
            if question.options.is_empty() {
                continue;
            }
            if question.tags.is_empty() {
                question.passage_related = None;
            } else {
                question.passage_related = Some(passage_id.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Passage, Question, QuestionTag};
    use std::collections::BTreeMap;

    fn passage(id: &str, q_start: u32) -> Passage {
        Passage::new(id.to_string(), String::new(), String::new(), q_start)
    }

    fn question(number: u32, with_options: bool, tags: Vec<QuestionTag>, related: Option<&str>) -> Question {
        let mut options = BTreeMap::new();
        if with_options {
            options.insert('A', "a".to_string());
            options.insert('B', "b".to_string());
            options.insert('C', "c".to_string());
            options.insert('D', "d".to_string());
        }
        Question {
            question_number: number,
            question_text: String::new(),
            options,
            answer: String::new(),
            passage_related: related.map(String::from),
            tags,
        }
    }

    #[test]
    fn test_tagged_questions_linked_to_range_passage() {
        let passages = vec![passage("passage_1", 1), passage("passage_2", 3)];
        let mut questions = vec![
            question(1, true, vec![QuestionTag::Reading], None),
            question(2, true, vec![QuestionTag::Reading], None),
            question(3, true, vec![QuestionTag::Cloze], None),
        ];

        fix_passage_links(&passages, &mut questions);

        assert_eq!(questions[0].passage_related.as_deref(), Some("passage_1"));
        assert_eq!(questions[1].passage_related.as_deref(), Some("passage_1"));
        assert_eq!(questions[2].passage_related.as_deref(), Some("passage_2"));
    }

    #[test]
    fn test_untagged_question_in_range_cleared() {
        // 篇章末题后面的排序题（有选项、无标签）被误挂后清除
        let passages = vec![passage("passage_1", 1)];
        let mut questions = vec![
            question(1, true, vec![QuestionTag::Reading], Some("passage_1")),
            question(2, true, Vec::new(), Some("passage_1")),
        ];

        fix_passage_links(&passages, &mut questions);

        assert_eq!(questions[0].passage_related.as_deref(), Some("passage_1"));
        assert_eq!(questions[1].passage_related, None);
    }

    #[test]
    fn test_question_without_options_untouched() {
        let passages = vec![passage("passage_1", 1)];
        let mut questions = vec![
            question(1, true, vec![QuestionTag::Reading], None),
            question(2, false, Vec::new(), Some("passage_1")),
        ];

        fix_passage_links(&passages, &mut questions);

        // 无选项的降级题目不参与修正
        assert_eq!(questions[1].passage_related.as_deref(), Some("passage_1"));
    }

    #[test]
    fn test_no_linkable_questions_at_all() {
        let passages = vec![passage("passage_1", 1)];
        let mut questions = vec![question(1, false, Vec::new(), None)];

        fix_passage_links(&passages, &mut questions);

        assert_eq!(questions[0].passage_related, None);
    }

    #[test]
    fn test_consistency_after_fix() {
        let passages = vec![passage("passage_1", 1), passage("passage_2", 4)];
        let mut questions: Vec<Question> = (1..=6)
            .map(|n| {
                let tags = if n % 3 == 0 { Vec::new() } else { vec![QuestionTag::Reading] };
                question(n, true, tags, Some("passage_1"))
            })
            .collect();

        fix_passage_links(&passages, &mut questions);

        // 修正后无标签的题目一律没有篇章关联
        for q in &questions {
            if q.tags.is_empty() {
                assert_eq!(q.passage_related, None, "题号 {}", q.question_number);
            }
        }
    }
}
