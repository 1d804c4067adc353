use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reinforcer_generator::{generate, FileConfig, GenerateOptions, Method, MethodAnalyzer};
use reinforcer_types::{MethodDescriptor, TypeDescriptor};

fn user_service_methods() -> Vec<MethodDescriptor> {
    let user = TypeDescriptor::pointer(TypeDescriptor::named("example.com/app/models", "User"));
    let method = |name: &str, params: Vec<TypeDescriptor>, results: Vec<TypeDescriptor>| {
        MethodDescriptor {
            name: name.to_string(),
            params,
            results,
            variadic: false,
        }
    };
    vec![
        method(
            "GetUser",
            vec![TypeDescriptor::context(), TypeDescriptor::basic("string")],
            vec![user.clone(), TypeDescriptor::error()],
        ),
        method(
            "ListUsers",
            vec![TypeDescriptor::context(), TypeDescriptor::basic("int")],
            vec![TypeDescriptor::slice(user.clone()), TypeDescriptor::error()],
        ),
        method(
            "SaveUser",
            vec![TypeDescriptor::context(), user],
            vec![TypeDescriptor::error()],
        ),
        method("Flush", vec![], vec![]),
        MethodDescriptor {
            name: "Tag".to_string(),
            params: vec![
                TypeDescriptor::context(),
                TypeDescriptor::slice(TypeDescriptor::basic("string")),
            ],
            results: vec![TypeDescriptor::error()],
            variadic: true,
        },
    ]
}

fn analyze(descriptors: &[MethodDescriptor]) -> Vec<Method> {
    let analyzer = MethodAnalyzer::default();
    descriptors
        .iter()
        .map(|m| analyzer.analyze_descriptor(m).unwrap())
        .collect()
}

fn analyze_methods(c: &mut Criterion) {
    let descriptors = user_service_methods();

    c.bench_function("analyze_methods", |b| {
        b.iter(|| analyze(black_box(&descriptors)))
    });
}

fn generate_single_service(c: &mut Criterion) {
    let files = vec![FileConfig::new(
        "UserService",
        "UserService",
        vec![],
        vec![],
        analyze(&user_service_methods()),
    )];
    let options = GenerateOptions::with_out_pkg("resilient");

    c.bench_function("generate_single_service", |b| {
        b.iter(|| generate(black_box(&options), black_box(&files)))
    });
}

fn generate_many_services(c: &mut Criterion) {
    let methods = analyze(&user_service_methods());
    let files: Vec<FileConfig> = (0..50)
        .map(|i| {
            let name = format!("Service{}", i);
            FileConfig::new(&name, &name, vec![], vec![], methods.clone())
        })
        .collect();
    let options = GenerateOptions::with_out_pkg("resilient");

    c.bench_function("generate_many_services", |b| {
        b.iter(|| generate(black_box(&options), black_box(&files)))
    });
}

criterion_group!(
    benches,
    analyze_methods,
    generate_single_service,
    generate_many_services
);
criterion_main!(benches);
