//! Spherical k-means on a tiny hand-written TF-IDF corpus, under each stopping policy.

use doclump::{Corpus, Kmeans, StoppingCriterion};

fn main() {
    // Three topics over a 6-term vocabulary, in the on-disk line format.
    let data = "\
0<fff>101<fff>0:0.9 1:0.4
0<fff>102<fff>0:0.8 1:0.5
0<fff>103<fff>0:0.95 1:0.3
1<fff>201<fff>2:0.9 3:0.4
1<fff>202<fff>2:0.85 3:0.5
1<fff>203<fff>2:0.7 3:0.7
2<fff>301<fff>4:0.9 5:0.4
2<fff>302<fff>4:0.6 5:0.8
2<fff>303<fff>4:0.75 5:0.65
";
    let corpus = Corpus::from_reader(data.as_bytes(), 6).unwrap();
    println!("{} documents, vocabulary of {}", corpus.len(), corpus.vocab_size());

    for criterion in [
        StoppingCriterion::MaxIterations(4),
        StoppingCriterion::CentroidStability(0),
        StoppingCriterion::SimilarityGrowth(0.0),
    ] {
        let fit = Kmeans::new(3)
            .with_seed(2018)
            .with_criterion(criterion)
            .fit(&corpus)
            .unwrap();
        let eval = fit.evaluate(&corpus).unwrap();

        println!("\n=== {criterion} ===");
        println!("  iterations: {}", eval.iterations);
        println!("  purity:     {:.4}", eval.purity);
        println!("  NMI:        {:.4}", eval.nmi);
        for (k, cluster) in fit.clusters().iter().enumerate() {
            let ids: Vec<u64> = cluster
                .members()
                .iter()
                .map(|&i| corpus.documents()[i].doc_id())
                .collect();
            println!("  cluster {k}: {ids:?}");
        }
    }
}
