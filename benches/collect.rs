use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kube_state_exporter::{
    collector::KindCollector,
    config::Options,
    resources::{statefulset, ObjectMeta, StatefulSet, StatefulSetSpec, StatefulSetStatus},
    store::StaticStore,
};

fn statefulsets(count: usize) -> Vec<StatefulSet> {
    (0..count)
        .map(|i| StatefulSet {
            metadata: ObjectMeta {
                name: format!("statefulset{i}"),
                namespace: format!("ns{}", i % 10),
                creation_timestamp: None,
                generation: i as i64,
                labels: BTreeMap::from([
                    ("app".to_string(), format!("app{i}")),
                    ("app.kubernetes.io/part-of".to_string(), "bench".to_string()),
                ]),
            },
            spec: StatefulSetSpec {
                replicas: Some(3),
                service_name: format!("svc{i}"),
            },
            status: StatefulSetStatus {
                observed_generation: Some(i as i64),
                replicas: 3,
                current_replicas: 3,
                ready_replicas: 2,
                updated_replicas: 3,
                current_revision: format!("rev-{i}"),
                update_revision: format!("rev-{i}"),
            },
        })
        .collect()
}

fn bench_collect(c: &mut Criterion) {
    let collector =
        statefulset::collector(StaticStore::new(statefulsets(1000)), &Options::default())
            .expect("valid families");

    c.bench_function("collect_1000_statefulsets", |b| {
        b.iter(|| black_box(collector.collect().expect("static store never fails")))
    });
}

criterion_group!(benches, bench_collect);
criterion_main!(benches);
