use dockerfile_optimizer::{AnalysisOptions, analyze, parse_dockerfile};
use proptest::prelude::*;

fn instruction() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("RUN apt-get update".to_string()),
        Just("RUN apt-get install -y curl".to_string()),
        Just("RUN apk add --no-cache bash".to_string()),
        Just("RUN npm install".to_string()),
        Just("RUN make && make install && rm -rf /tmp/* && echo ok && ls".to_string()),
        Just("COPY . .".to_string()),
        Just("COPY package.json .".to_string()),
        Just("ADD src /src".to_string()),
        Just("WORKDIR /app".to_string()),
        Just("ENV A=1".to_string()),
        Just("# comment".to_string()),
        Just(String::new()),
    ]
}

fn stage() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(instruction(), 0..6)
}

fn dockerfile(stages: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (i, body) in stages.iter().enumerate() {
        out.push_str(&format!("FROM node:18 AS s{}\n", i));
        for line in body {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

proptest! {
    #[test]
    fn stage_count_matches_from_count(stages in prop::collection::vec(stage(), 1..5)) {
        let result = parse_dockerfile(&dockerfile(&stages));
        prop_assert_eq!(result.stages.len(), stages.len());
        prop_assert_eq!(result.multi_stage, stages.len() > 1);
        for stage in &result.stages {
            for instr in result.stage_instructions(stage) {
                prop_assert!(instr.line >= stage.start_line);
            }
        }
    }

    #[test]
    fn suggestions_are_severity_ordered(stages in prop::collection::vec(stage(), 1..4)) {
        let report = analyze(&dockerfile(&stages), &AnalysisOptions::default());
        let ranks: Vec<u8> = report.suggestions().iter().map(|s| s.severity.rank()).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

        let total = report.suggestions().len();
        let summary = report.summary();
        prop_assert_eq!(summary.high + summary.medium + summary.low, total);
        for suggestion in report.suggestions() {
            prop_assert!(!suggestion.lines.is_empty());
        }
    }

    #[test]
    fn analysis_is_deterministic(stages in prop::collection::vec(stage(), 1..4)) {
        let content = dockerfile(&stages);
        let first = serde_json::to_string(&analyze(&content, &AnalysisOptions::default())).unwrap();
        let second = serde_json::to_string(&analyze(&content, &AnalysisOptions::default())).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parser_never_panics(input in "(\\PC|\n|\\\\){0,400}") {
        let result = parse_dockerfile(&input);
        prop_assert!(!result.stages.is_empty());
        prop_assert!(result.instructions.windows(2).all(|w| w[0].line <= w[1].line));
    }
}
