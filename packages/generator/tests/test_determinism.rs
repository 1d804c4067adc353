use proptest::prelude::*;
use reinforcer_generator::{
    generate, FileConfig, GenerateOptions, Method, MethodAnalyzer, Strategy as BodyStrategy,
};
use reinforcer_types::TypeDescriptor;

fn arb_param() -> impl Strategy<Value = TypeDescriptor> {
    prop_oneof![
        Just(TypeDescriptor::basic("string")),
        Just(TypeDescriptor::basic("int")),
        Just(TypeDescriptor::context()),
        Just(TypeDescriptor::pointer(TypeDescriptor::named(
            "example.com/app/models",
            "User"
        ))),
        Just(TypeDescriptor::map(
            TypeDescriptor::basic("string"),
            TypeDescriptor::named("example.com/lib/v2", "Value")
        )),
        Just(TypeDescriptor::slice(TypeDescriptor::basic("byte"))),
    ]
}

prop_compose! {
    fn arb_method(index: usize)(
        params in prop::collection::vec(arb_param(), 0..4),
        results in prop::collection::vec(arb_param(), 0..3),
        returns_error in any::<bool>(),
    ) -> Method {
        let mut results = results;
        if returns_error {
            results.push(TypeDescriptor::error());
        }
        MethodAnalyzer::default()
            .analyze(&format!("Method{}", index), &params, &results, false)
            .unwrap()
    }
}

fn arb_methods() -> impl Strategy<Value = Vec<Method>> {
    (0usize..6).prop_flat_map(|count| (0..count).map(arb_method).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn generation_is_deterministic(methods in arb_methods(), ignore in any::<bool>()) {
        let mut options = GenerateOptions::with_out_pkg("resilient");
        options.ignore_no_return_methods = ignore;
        let files = vec![FileConfig::new("Service", "Service", vec![], vec![], methods)];

        let first = generate(&options, &files).unwrap();
        let second = generate(&options, &files.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn methods_keep_declared_order(methods in arb_methods()) {
        let files = vec![FileConfig::new("Service", "Service", vec![], vec![], methods.clone())];
        let generated = generate(&GenerateOptions::default(), &files).unwrap();
        let contents = &generated.files[0].contents;

        let positions: Vec<usize> = methods
            .iter()
            .map(|m| contents.find(&format!("func (s *Service) {}(", m.name)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        prop_assert_eq!(positions, sorted);
    }

    #[test]
    fn background_context_only_without_context_param(methods in arb_methods()) {
        let files = vec![FileConfig::new("Service", "Service", vec![], vec![], methods.clone())];
        let generated = generate(&GenerateOptions::default(), &files).unwrap();
        let contents = &generated.files[0].contents;

        for method in &methods {
            if BodyStrategy::classify(method, false) == BodyStrategy::PassThrough {
                continue;
            }
            let forwarded = format!("s.run(ctx, ServiceMethods.{},", method.name);
            let background = format!("s.run(context.Background(), ServiceMethods.{},", method.name);
            if method.has_context {
                prop_assert!(contents.contains(&forwarded));
                prop_assert!(!contents.contains(&background));
            } else {
                prop_assert!(contents.contains(&background));
                prop_assert!(!contents.contains(&forwarded));
            }
        }
    }
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let analyzer = MethodAnalyzer::default();
    let methods = vec![
        analyzer
            .analyze(
                "Zeta",
                &[TypeDescriptor::named("example.com/b/models", "Z")],
                &[TypeDescriptor::error()],
                false,
            )
            .unwrap(),
        analyzer
            .analyze(
                "Alpha",
                &[TypeDescriptor::named("example.com/a/models", "A")],
                &[],
                false,
            )
            .unwrap(),
    ];
    let files = vec![FileConfig::new("Service", "Service", vec![], vec![], methods)];
    let options = GenerateOptions::default();

    let runs: Vec<_> = (0..5).map(|_| generate(&options, &files).unwrap()).collect();
    assert!(runs.windows(2).all(|pair| pair[0] == pair[1]));

    let contents = &runs[0].files[0].contents;
    assert!(contents.contains(
        "import (\n\t\"context\"\n\tmodels1 \"example.com/a/models\"\n\tmodels \"example.com/b/models\"\n)\n"
    ));
    assert!(contents.find("Zeta(").unwrap() < contents.find("Alpha(").unwrap());
}
