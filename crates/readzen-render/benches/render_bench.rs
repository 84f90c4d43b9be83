// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the readzen-render crate. Measures a full page
// render (segmentation, annotation, reconciliation) with every aid switched
// off and with every aid switched on.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use readzen_core::{PhonemeCatalog, Preferences, ReadingAid};
use readzen_render::{render_page, to_html};

/// A page of mixed French prose with a heading, a reference table and two
/// stray images after it.
fn sample_page() -> String {
    let prose = "Les enfants mangent du chocolat au jardin de Paris en 1998. \
                 Maman prépare une banane pendant que Victor lit tranquillement. ";
    let mut page = String::from("## Chapitre premier\n\n");
    for _ in 0..20 {
        page.push_str(prose);
    }
    page.push_str(
        "\n\n| Ref | Description |\n|---|---|\n| REF-01 | Entrée |\n| REF-02 | Cour |\n\n\
         ![Entrée](img/a.png)\n\n![Cour](img/b.png)",
    );
    page
}

fn all_aids() -> Preferences {
    let mut prefs = Preferences::plain();
    for aid in ReadingAid::ALL {
        prefs.set_aid(aid, true);
    }
    prefs.active_phonemes = PhonemeCatalog::standard().seed_all();
    prefs
}

fn bench_render(c: &mut Criterion) {
    let page = sample_page();
    let plain = Preferences::plain();
    let full = all_aids();

    c.bench_function("render_page (plain)", |b| {
        b.iter(|| black_box(render_page(black_box(&page), &plain)));
    });

    c.bench_function("render_page + to_html (all aids)", |b| {
        b.iter(|| {
            let tree = render_page(black_box(&page), &full);
            black_box(to_html(&tree));
        });
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
