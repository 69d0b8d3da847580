use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Writes `sample_data.parquet`: one row per measurement with a unique
/// `measurement_id` to use as the index column.
fn main() -> Result<()> {
    env_logger::init();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let samples = ["Sample_A", "Sample_B", "Sample_C"];
    let concentrations = [0.1, 0.5, 1.0, 2.0, 5.0];
    let operators = ["Alice", "Bob"];

    let mut all_id: Vec<i64> = Vec::new();
    let mut all_sample: Vec<&str> = Vec::new();
    let mut all_conc: Vec<f64> = Vec::new();
    let mut all_operator: Vec<&str> = Vec::new();
    let mut all_response: Vec<f64> = Vec::new();

    let mut row_id: i64 = 1000;
    for sample in samples {
        for conc in concentrations {
            for operator in operators {
                all_id.push(row_id);
                all_sample.push(sample);
                all_conc.push(conc);
                all_operator.push(operator);
                all_response.push(conc * 0.8 + rng.gen_range(-0.05..0.05));
                row_id += 1;
            }
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("measurement_id", DataType::Int64, false),
        Field::new("sample", DataType::Utf8, false),
        Field::new("concentration", DataType::Float64, false),
        Field::new("operator", DataType::Utf8, false),
        Field::new("response", DataType::Float64, false),
    ]));

    let n_rows = all_id.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(all_id)),
            Arc::new(StringArray::from(all_sample)),
            Arc::new(Float64Array::from(all_conc)),
            Arc::new(StringArray::from(all_operator)),
            Arc::new(Float64Array::from(all_response)),
        ],
    )
    .context("building record batch")?;

    let output_path = "sample_data.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    log::info!("wrote {n_rows} rows to {output_path}");
    println!("Wrote {n_rows} measurements to {output_path}");
    Ok(())
}
